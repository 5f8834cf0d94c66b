//! Usage-file preferences: file name, date format, and date input mode.

use crate::error::Result;
use crate::fields::{DateFormat, DateInputMode};
use crate::input::Prompter;
use crate::session::{ConfigKey, SessionContext};
use chrono::{Datelike, Local};
use log::info;
use regex::Regex;

/// File name template; `[Years]` is replaced by the entered season.
pub const DEFAULT_USAGE_NAME: &str = "radiators_usage_[Years].csv";
const YEARS_PLACEHOLDER: &str = "[Years]";

const YEARS_PATTERN: &str = r"^\d{4}-\d{4}$";
const DATE_FORMAT_PATTERN: &str = r"^(European|American)$";
const DATE_INPUT_PATTERN: &str = r"^(Auto|Manual)$";

const USAGE_GENERATION: &str = "
                USAGE FILE GENERATION

We're going to create the usage file used to track radiator heat readings.

1. Choose the heating season years to use in the file name.
2. Choose the date format: European (DD/MM/YYYY) or American (MM/DD/YYYY).
3. Choose whether dates are entered manually or filled in automatically.

Press **Enter** to continue...";

/// Preferences that shape the usage file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageSettings {
    pub file_name: String,
    pub date_format: DateFormat,
    pub input_mode: DateInputMode,
}

impl UsageSettings {
    /// Reads the settings from the context, if all three are present.
    pub fn from_context(ctx: &SessionContext) -> Option<Self> {
        Some(UsageSettings {
            file_name: ctx.get(ConfigKey::UsageName)?,
            date_format: ctx.get(ConfigKey::DateFormat)?,
            input_mode: ctx.get(ConfigKey::DateInputMode)?,
        })
    }

    /// Writes the settings into the context.
    pub fn store(&self, ctx: &mut SessionContext) {
        ctx.set(ConfigKey::UsageName, &self.file_name);
        ctx.set(ConfigKey::DateFormat, self.date_format);
        ctx.set(ConfigKey::DateInputMode, self.input_mode);
    }
}

/// Builds the usage file name for a `YYYY-YYYY` season.
pub fn usage_file_name(years: &str) -> String {
    DEFAULT_USAGE_NAME.replace(YEARS_PLACEHOLDER, years)
}

/// Returns the settings for this run.
///
/// On the first run all three are asked for. Later runs show the stored
/// settings and let the user change any of them.
pub fn configure<P: Prompter + ?Sized>(
    ctx: &mut SessionContext,
    prompter: &mut P,
) -> Result<UsageSettings> {
    let mut settings = match UsageSettings::from_context(ctx) {
        Some(existing) => existing,
        None => {
            info!("Starting first-time setup for the usage file");
            prompter.pause(USAGE_GENERATION)?;
            let settings = UsageSettings {
                file_name: prompt_file_name(prompter)?,
                date_format: prompt_date_format(prompter)?,
                input_mode: prompt_input_mode(prompter)?,
            };
            settings.store(ctx);
            return Ok(settings);
        }
    };

    let overview = format!(
        "
                MODIFY USAGE CONFIGURATIONS

The usage file: {name} was created in a previous run. Below are the current configurations:

- File Name: {name} (e.g., change the years to create a new file for a new heating season).
- Date Format: {format} (e.g., European or American format).
- Date Input Mode: {mode} (e.g., manual or automatic).

Having reviewed these configurations, do you want to modify any of them? (yes/no)
",
        name = settings.file_name,
        format = settings.date_format,
        mode = settings.input_mode,
    );
    if !prompter.confirm(&overview)? {
        return Ok(settings);
    }

    info!("User decided to modify the usage file configurations");
    let mut changed = false;
    if prompter.confirm(&change_prompt("usage filename", &settings.file_name))? {
        settings.file_name = prompt_file_name(prompter)?;
        changed = true;
    }
    if prompter.confirm(&change_prompt("date format", &settings.date_format.to_string()))? {
        settings.date_format = prompt_date_format(prompter)?;
        changed = true;
    }
    if prompter.confirm(&change_prompt("date input mode", &settings.input_mode.to_string()))? {
        settings.input_mode = prompt_input_mode(prompter)?;
        changed = true;
    }
    if changed {
        settings.store(ctx);
    }
    Ok(settings)
}

fn change_prompt(label: &str, current: &str) -> String {
    format!("Change {}? (yes/no)\nCurrent: {}\n", label, current)
}

/// Asks for an entry matching `pattern` until the user confirms it.
fn prompt_confirmed<P, F>(prompter: &mut P, prompt: &str, pattern: &str, shape: F) -> Result<String>
where
    P: Prompter + ?Sized,
    F: Fn(String) -> String,
{
    let pattern = Regex::new(pattern).expect("settings patterns are valid");
    loop {
        let entry = shape(prompter.matching(prompt, &pattern)?);
        if prompter.confirm(&format!("Confirm: {}? (yes/no)\n", entry))? {
            return Ok(entry);
        }
    }
}

fn prompt_file_name<P: Prompter + ?Sized>(prompter: &mut P) -> Result<String> {
    let start_year = Local::now().year();
    let prompt = format!(
        "\nEnter the years for the usage file name ({}), e.g. {}-{}:\n",
        DEFAULT_USAGE_NAME,
        start_year,
        start_year + 1
    );
    prompt_confirmed(prompter, &prompt, YEARS_PATTERN, |years| usage_file_name(&years))
}

fn prompt_date_format<P: Prompter + ?Sized>(prompter: &mut P) -> Result<DateFormat> {
    let prompt = format!(
        "\n                DATE FORMAT\n\nType:\n- 'European' for {}\nor\n- 'American' for {}\n",
        DateFormat::European.label(),
        DateFormat::American.label()
    );
    let entry = prompt_confirmed(prompter, &prompt, DATE_FORMAT_PATTERN, |s| s)?;
    Ok(if entry == "European" {
        DateFormat::European
    } else {
        DateFormat::American
    })
}

fn prompt_input_mode<P: Prompter + ?Sized>(prompter: &mut P) -> Result<DateInputMode> {
    let prompt = "\n                DATE INPUT MODE\n\nShould dates be entered automatically or manually?\nType 'Auto' or 'Manual'\n";
    let entry = prompt_confirmed(prompter, prompt, DATE_INPUT_PATTERN, |s| s)?;
    Ok(if entry == "Auto" {
        DateInputMode::Auto
    } else {
        DateInputMode::Manual
    })
}
