use crate::listing::Listable;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Demand {
    pub id: String,
    pub material_number_customer: String,
    #[serde(default)]
    pub material_description_customer: String,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub supplier_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl Listable for Demand {
    const COLUMNS: &'static [&'static str] = &[
        "materialNumberCustomer",
        "materialDescriptionCustomer",
        "customerName",
        "supplierName",
        "status",
        "id",
    ];
    const SEARCHABLE: &'static [&'static str] = &[
        "id",
        "materialNumberCustomer",
        "materialDescriptionCustomer",
        "customerName",
        "supplierName",
    ];

    fn value(&self, column: &str) -> String {
        match column {
            "id" => self.id.clone(),
            "materialNumberCustomer" => self.material_number_customer.clone(),
            "materialDescriptionCustomer" => self.material_description_customer.clone(),
            "customerName" => self.customer_name.clone().unwrap_or_default(),
            "supplierName" => self.supplier_name.clone().unwrap_or_default(),
            "status" => self.status.clone().unwrap_or_default(),
            _ => String::new(),
        }
    }
}
