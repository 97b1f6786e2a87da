//! Static engine settings
//!
//! Sheet names, input column positions and output defaults. Every field has
//! a default matching the standard sales workbook layout, so a settings file
//! only needs to name what differs.

use serde::{Deserialize, Serialize};

/// 0-based column positions in the input sheet
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputColumns {
    pub sales_person: usize,
    #[serde(rename = "type")]
    pub lead_type: usize,
    pub client: usize,
    pub lot: usize,
    pub presentation_date: usize,
    pub shot_grade: usize,
    pub build_type: usize,
}

impl Default for InputColumns {
    fn default() -> Self {
        Self {
            sales_person: 1,       // B
            lead_type: 2,          // C
            client: 3,             // D
            lot: 6,                // G
            presentation_date: 11, // L
            shot_grade: 14,        // O
            build_type: 15,        // P
        }
    }
}

/// Immutable settings for one conversion run
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Sheet holding type and milestone rules
    pub parameter_sheet: String,
    /// Sheet mapping salesperson aliases to display names
    pub sales_alias_sheet: String,
    /// Sheet holding candidate rows
    pub input_sheet: String,
    /// Name of the single sheet in the output workbook
    pub output_sheet: String,
    pub input_columns: InputColumns,
    pub default_sales_person: String,
    pub default_shot_grade: String,
    pub default_build_type: String,
    /// chrono format string for dates in the output
    pub output_date_format: String,
    /// Length of the scheduling window after today
    pub window_years: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            parameter_sheet: "Schedule_Code".into(),
            sales_alias_sheet: "Sales_Alias".into(),
            input_sheet: "Potential".into(),
            output_sheet: "Schedule".into(),
            input_columns: InputColumns::default(),
            default_sales_person: "Not Assigned".into(),
            default_shot_grade: "Not Specified".into(),
            default_build_type: "Not Specified".into(),
            output_date_format: "%m/%d/%Y".into(),
            window_years: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_standard_workbook() {
        let settings = Settings::default();
        assert_eq!(settings.parameter_sheet, "Schedule_Code");
        assert_eq!(settings.sales_alias_sheet, "Sales_Alias");
        assert_eq!(settings.input_sheet, "Potential");
        assert_eq!(settings.input_columns.presentation_date, 11);
        assert_eq!(settings.input_columns.build_type, 15);
        assert_eq!(settings.default_sales_person, "Not Assigned");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            input_sheet = "Pipeline"
            window_years = 3

            [input_columns]
            type = 4
            "#,
        )
        .unwrap();

        assert_eq!(settings.input_sheet, "Pipeline");
        assert_eq!(settings.window_years, 3);
        assert_eq!(settings.input_columns.lead_type, 4);
        assert_eq!(settings.input_columns.lot, 6);
        assert_eq!(settings.parameter_sheet, "Schedule_Code");
    }
}
