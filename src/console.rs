//! Terminal rendering of list views and the line-driven alert wizard.

use crate::{
    dashboard::Dashboard,
    gateway::{
        AlertGateway,
        alert::{ConfiguredAlert, DedicatedTarget, MonitoredObjects, ThresholdType},
        capacity_group::CapacityGroup,
        demand::Demand,
    },
    listing::{ListView, Listable, Page, matches},
    notification::{self, ObjectType},
    wizard::{AlertWizard, Step, ValidationErrors, WizardError},
};
use comfy_table::{Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};

/// Render one page of records as a table followed by a position footer
pub fn render_table<T: Listable>(page: &Page<&T>) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(T::COLUMNS.to_vec());

    for record in &page.items {
        table.add_row(T::COLUMNS.iter().map(|column| record.value(column)));
    }

    format!(
        "{table}\npage {}/{} ({} matches)\n",
        page.page, page.total_pages, page.total
    )
}

/// Objects offered on the dedicated targets step
#[derive(Debug, Clone, Default)]
pub struct Pickers {
    pub demands: Vec<Demand>,
    pub capacity_groups: Vec<CapacityGroup>,
}

enum Input {
    Text(String),
    Back,
    Cancel,
}

const TARGETS_HELP: &str = "Commands: list, find <text>, demand <n>, group <n>, remove <n>, next, back, cancel";

/// Drives an [`AlertWizard`] from a line-oriented input stream
pub struct Console<R, W> {
    lines: Lines<R>,
    output: W,
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(input: R, output: W) -> Self {
        Self {
            lines: input.lines(),
            output,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    async fn say(&mut self, text: &str) -> anyhow::Result<()> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.write_all(b"\n").await?;
        self.output.flush().await?;
        Ok(())
    }

    /// Prompt and read one line. End of input counts as cancel.
    ///
    /// `back` and `cancel` are commands at every prompt. A leading backslash makes the
    /// rest of the line plain text, so `\back` answers the prompt with "back".
    async fn ask(&mut self, prompt: &str) -> anyhow::Result<Input> {
        self.output.write_all(format!("{prompt}> ").as_bytes()).await?;
        self.output.flush().await?;

        let Some(line) = self.lines.next_line().await? else {
            return Ok(Input::Cancel);
        };

        Ok(match line.trim() {
            "back" => Input::Back,
            "cancel" => Input::Cancel,
            text => match text.strip_prefix('\\') {
                Some(literal) => Input::Text(literal.to_string()),
                None => Input::Text(text.to_string()),
            },
        })
    }

    async fn show_errors(&mut self, errors: &ValidationErrors) -> anyhow::Result<()> {
        for (field, message) in errors.iter() {
            self.say(&format!("  ! {field}: {message}")).await?;
        }
        Ok(())
    }

    /// Run the wizard to completion.
    ///
    /// Returns the created alert, or `None` when the user cancelled.
    pub async fn run_wizard<G: AlertGateway>(
        &mut self,
        dashboard: &Dashboard<G>,
        pickers: &Pickers,
        alerts: &mut ListView<ConfiguredAlert>,
    ) -> anyhow::Result<Option<ConfiguredAlert>> {
        let mut wizard = AlertWizard::new();

        loop {
            self.say(&format!("\nStep {}", wizard.step())).await?;

            let input = match wizard.step() {
                Step::Details => self.details(&mut wizard).await?,
                Step::Targets => self.targets(&mut wizard, pickers).await?,
                Step::Threshold => self.threshold(&mut wizard).await?,
                Step::Review => {
                    for (label, value) in wizard.review() {
                        self.say(&format!("  {label}: {value}")).await?;
                    }

                    match self.ask("submit, back or cancel").await? {
                        Input::Text(text) if text == "submit" => {
                            match dashboard.create_alert(&mut wizard, alerts).await {
                                Ok(alert) => {
                                    self.say(&format!("Alert {} created", alert.id)).await?;
                                    return Ok(Some(alert));
                                }
                                Err(WizardError::Remote(e)) => {
                                    let notification =
                                        notification::for_error(ObjectType::AlertCreation, &e);
                                    self.say(&format!("  ! {notification}")).await?;
                                }
                                Err(WizardError::Invalid(errors)) => {
                                    self.show_errors(&errors).await?
                                }
                                Err(e) => self.say(&format!("  ! {e}")).await?,
                            }
                            continue;
                        }
                        Input::Text(_) => continue,
                        other => other,
                    }
                }
            };

            match input {
                Input::Cancel => {
                    wizard.cancel()?;
                    self.say("Alert configuration cancelled").await?;
                    return Ok(None);
                }
                Input::Back => {
                    wizard.back()?;
                }
                Input::Text(_) => match wizard.next() {
                    Ok(_) => {}
                    Err(WizardError::Invalid(errors)) => self.show_errors(&errors).await?,
                    Err(e) => return Err(e.into()),
                },
            }
        }
    }

    async fn details(&mut self, wizard: &mut AlertWizard) -> anyhow::Result<Input> {
        let name = match self.ask("Alert name").await? {
            Input::Text(name) => name,
            other => return Ok(other),
        };
        wizard.set_name(name)?;

        let choices = MonitoredObjects::ALL.map(|kind| kind.as_str()).join(", ");

        loop {
            match self.ask(&format!("Monitored objects ({choices})")).await? {
                Input::Text(text) if text.is_empty() => return Ok(Input::Text(text)),
                Input::Text(text) => match text.parse::<MonitoredObjects>() {
                    Ok(kind) => {
                        wizard.set_monitored_objects(kind)?;
                        return Ok(Input::Text(text));
                    }
                    Err(e) => self.say(&format!("  ! {e}")).await?,
                },
                other => return Ok(other),
            }
        }
    }

    async fn targets(
        &mut self,
        wizard: &mut AlertWizard,
        pickers: &Pickers,
    ) -> anyhow::Result<Input> {
        self.say(TARGETS_HELP).await?;

        loop {
            let text = match self.ask("target").await? {
                Input::Text(text) => text,
                other => return Ok(other),
            };

            let (command, argument) = text
                .split_once(' ')
                .map(|(command, argument)| (command, argument.trim()))
                .unwrap_or((text.as_str(), ""));

            match command {
                "next" => return Ok(Input::Text(command.to_string())),
                "list" => {
                    self.show_pickers(pickers, "").await?;
                    self.show_targets(wizard).await?;
                }
                "find" => self.show_pickers(pickers, argument).await?,
                "demand" => {
                    let demand = position(argument).and_then(|i| pickers.demands.get(i));
                    match demand {
                        Some(demand) => {
                            wizard.add_target(DedicatedTarget::demand(&demand.id))?;
                            self.show_targets(wizard).await?;
                        }
                        None => self.say(&format!("  ! no demand {argument}")).await?,
                    }
                }
                "group" => {
                    let group = position(argument).and_then(|i| pickers.capacity_groups.get(i));
                    match group {
                        Some(group) => {
                            wizard.add_target(DedicatedTarget::capacity_group(
                                &group.capacity_group_id,
                            ))?;
                            self.show_targets(wizard).await?;
                        }
                        None => self.say(&format!("  ! no capacity group {argument}")).await?,
                    }
                }
                "remove" => {
                    match position(argument).map(|i| wizard.remove_target(i)) {
                        Some(Ok(_)) => self.show_targets(wizard).await?,
                        Some(Err(e)) => self.say(&format!("  ! {e}")).await?,
                        None => self.say(&format!("  ! no target {argument}")).await?,
                    }
                }
                _ => self.say(TARGETS_HELP).await?,
            }
        }
    }

    async fn show_pickers(&mut self, pickers: &Pickers, query: &str) -> anyhow::Result<()> {
        self.say("Demands:").await?;
        for (i, demand) in pickers.demands.iter().enumerate() {
            if matches(demand, query) {
                self.say(&format!(
                    "  {:>3}  {}  {}",
                    i + 1,
                    demand.material_number_customer,
                    demand.material_description_customer
                ))
                .await?;
            }
        }

        self.say("Capacity groups:").await?;
        for (i, group) in pickers.capacity_groups.iter().enumerate() {
            if matches(group, query) {
                self.say(&format!(
                    "  {:>3}  {}  {}",
                    i + 1,
                    group.capacity_group_id,
                    group.name
                ))
                .await?;
            }
        }

        Ok(())
    }

    async fn show_targets(&mut self, wizard: &AlertWizard) -> anyhow::Result<()> {
        let targets: Vec<String> = wizard
            .draft()
            .dedicated_targets()
            .iter()
            .enumerate()
            .map(|(i, target)| format!("  {:>3}  {} {}", i + 1, target.kind, target.object_id))
            .collect();

        self.say(&format!("Selected targets: {}", targets.len())).await?;
        for line in targets {
            self.say(&line).await?;
        }

        Ok(())
    }

    async fn threshold(&mut self, wizard: &mut AlertWizard) -> anyhow::Result<Input> {
        loop {
            match self.ask("Threshold type (ABSOLUTE, RELATIVE)").await? {
                Input::Text(text) if text.is_empty() => break,
                Input::Text(text) => match text.parse::<ThresholdType>() {
                    Ok(threshold_type) => {
                        wizard.set_threshold_type(threshold_type)?;
                        break;
                    }
                    Err(e) => self.say(&format!("  ! {e}")).await?,
                },
                other => return Ok(other),
            }
        }

        match self.ask("Threshold value").await? {
            Input::Text(value) => {
                wizard.set_threshold_value(value.clone())?;
                Ok(Input::Text(value))
            }
            other => Ok(other),
        }
    }
}

/// 1-based position typed by the user to a 0-based index
fn position(argument: &str) -> Option<usize> {
    argument.parse::<usize>().ok()?.checked_sub(1)
}
