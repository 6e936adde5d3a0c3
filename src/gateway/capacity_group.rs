use crate::listing::Listable;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CapacityGroup {
    pub capacity_group_id: String,
    pub name: String,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub supplier_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl Listable for CapacityGroup {
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "capacityGroupId",
        "customerName",
        "supplierName",
        "status",
    ];
    const SEARCHABLE: &'static [&'static str] =
        &["name", "capacityGroupId", "customerName", "supplierName"];

    fn value(&self, column: &str) -> String {
        match column {
            "capacityGroupId" => self.capacity_group_id.clone(),
            "name" => self.name.clone(),
            "customerName" => self.customer_name.clone().unwrap_or_default(),
            "supplierName" => self.supplier_name.clone().unwrap_or_default(),
            "status" => self.status.clone().unwrap_or_default(),
            _ => String::new(),
        }
    }
}
