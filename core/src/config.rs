use crate::{columns, types::Variant};
use serde::{Deserialize, Serialize};

// ── Parameter field source ───────────────────────────────────────────────────

/// Where a tracker row's threshold column name comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ParameterSource {
    /// Read the row's "Parameter Type" cell.
    PerRow,
    /// Ignore "Parameter Type" and always use this column.
    Fixed { field: String },
}

impl ParameterSource {
    pub fn fixed(field: &str) -> Self {
        ParameterSource::Fixed {
            field: field.to_string(),
        }
    }

    pub fn field_for<'a>(&'a self, parameter_type: &'a str) -> &'a str {
        match self {
            ParameterSource::PerRow => parameter_type,
            ParameterSource::Fixed { field } => field,
        }
    }
}

impl Default for ParameterSource {
    fn default() -> Self {
        ParameterSource::PerRow
    }
}

// ── Formula set ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormulaSet {
    /// Effectiveness over all extracted alerts, SAR yields, reductions.
    Atl,
    /// Effectiveness over decisioned Interesting + Not Interesting only.
    Btl,
}

// ── Variant config ───────────────────────────────────────────────────────────

/// Everything that differs between the ATL and BTL pipelines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantConfig {
    pub variant: Variant,
    /// Compare Rule IDs upper-cased.
    pub case_insensitive_rule: bool,
    /// Whether the population carries a "SAR Filed" disposition.
    pub tracks_sar: bool,
    pub formulas: FormulaSet,
    #[serde(default)]
    pub parameter_source: ParameterSource,
    /// Broadcast a "Date Range" column built from alert dates.
    pub date_range: bool,
}

impl VariantConfig {
    pub fn atl() -> Self {
        Self {
            variant: Variant::Atl,
            case_insensitive_rule: true,
            tracks_sar: true,
            formulas: FormulaSet::Atl,
            parameter_source: ParameterSource::PerRow,
            date_range: false,
        }
    }

    pub fn btl() -> Self {
        Self {
            variant: Variant::Btl,
            case_insensitive_rule: false,
            tracks_sar: false,
            formulas: FormulaSet::Btl,
            parameter_source: ParameterSource::PerRow,
            date_range: true,
        }
    }

    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Atl => Self::atl(),
            Variant::Btl => Self::btl(),
        }
    }

    pub fn with_parameter_source(mut self, source: ParameterSource) -> Self {
        self.parameter_source = source;
        self
    }

    /// Result columns appended to the tracker, in output order.
    pub fn result_columns(&self) -> &'static [&'static str] {
        match (self.formulas, self.date_range) {
            (FormulaSet::Atl, false) => columns::ATL_RESULT_COLUMNS,
            (FormulaSet::Btl, false) => columns::BTL_RESULT_COLUMNS,
            (FormulaSet::Atl, true) => ATL_WITH_DATE_RANGE,
            (FormulaSet::Btl, true) => BTL_WITH_DATE_RANGE,
        }
    }
}

const ATL_WITH_DATE_RANGE: &[&str] = &[
    columns::DATE_RANGE,
    columns::NUM_ALERTS_EXTRACTED,
    columns::SARS_FILED,
    columns::INTERESTING_ALERTS,
    columns::NOT_INTERESTING_ALERTS,
    columns::DATA_QUALITY_ALERTS,
    columns::EFFECTIVENESS,
    columns::SAR_YIELD,
    columns::PROP_SARS_FILED,
    columns::PROP_INTERESTING_ALERTS,
    columns::PROP_NOT_INTERESTING_ALERTS,
    columns::PROP_EFFECTIVENESS,
    columns::PROP_SAR_YIELD,
    columns::NOT_INTERESTING_ALERT_REDUCTION,
    columns::NET_EFFECTIVENESS,
    columns::NET_SAR_YIELD,
    columns::NET_NOT_INTERESTING_ALERT_REDUCTION,
    columns::MIN_VAL,
    columns::MAX_VAL,
    columns::ALERT_COUNT,
    columns::PROPOSED_ALERT_COUNT,
    columns::PROPOSED_ALERT_REDUCTION,
];

const BTL_WITH_DATE_RANGE: &[&str] = &[
    columns::DATE_RANGE,
    columns::NUM_ALERTS_EXTRACTED,
    columns::NUM_ALERTS_SAMPLED,
    columns::INTERESTING_ALERTS,
    columns::NOT_INTERESTING_ALERTS,
    columns::DATA_QUALITY_ALERTS,
    columns::EFFECTIVENESS,
    columns::PROP_INTERESTING_ALERTS,
    columns::PROP_NOT_INTERESTING_ALERTS,
    columns::PROP_EFFECTIVENESS,
    columns::NET_EFFECTIVENESS,
    columns::MIN_VAL,
    columns::MAX_VAL,
];

// ── Run config file ──────────────────────────────────────────────────────────

/// On-disk form; every field but the variant is optional.
#[derive(Debug, Clone, Deserialize)]
struct TuningConfigFile {
    variant: Variant,
    #[serde(default)]
    case_insensitive_rule: Option<bool>,
    #[serde(default)]
    tracks_sar: Option<bool>,
    #[serde(default)]
    formulas: Option<FormulaSet>,
    #[serde(default)]
    parameter_source: Option<ParameterSource>,
    #[serde(default)]
    date_range: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TuningConfig {
    pub variant: VariantConfig,
}

impl TuningConfig {
    pub fn new(variant: VariantConfig) -> Self {
        Self { variant }
    }

    /// Load from a JSON file. Unset fields take the named variant's preset.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let file: TuningConfigFile = serde_json::from_str(json)?;
        let preset = VariantConfig::for_variant(file.variant);
        let variant = VariantConfig {
            variant: file.variant,
            case_insensitive_rule: file
                .case_insensitive_rule
                .unwrap_or(preset.case_insensitive_rule),
            tracks_sar: file.tracks_sar.unwrap_or(preset.tracks_sar),
            formulas: file.formulas.unwrap_or(preset.formulas),
            parameter_source: file.parameter_source.unwrap_or(preset.parameter_source),
            date_range: file.date_range.unwrap_or(preset.date_range),
        };
        Ok(Self { variant })
    }

    /// Fail when a variant requested on the command line disagrees with
    /// the one this config names.
    pub fn ensure_variant(&self, requested: Variant) -> anyhow::Result<()> {
        if self.variant.variant != requested {
            anyhow::bail!(
                "config file is for variant '{}' but '{}' was requested",
                self.variant.variant,
                requested
            );
        }
        Ok(())
    }

    /// Preset for `variant` with defaults everywhere.
    pub fn default_for(variant: Variant) -> Self {
        Self::new(VariantConfig::for_variant(variant))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_differ_where_feeds_differ() {
        let atl = VariantConfig::atl();
        let btl = VariantConfig::btl();
        assert!(atl.case_insensitive_rule);
        assert!(!btl.case_insensitive_rule);
        assert!(atl.tracks_sar);
        assert!(!btl.tracks_sar);
        assert_eq!(atl.result_columns(), columns::ATL_RESULT_COLUMNS);
        assert_eq!(btl.result_columns()[0], columns::DATE_RANGE);
    }

    #[test]
    fn config_file_overrides_preset_fields() {
        let config = TuningConfig::from_json_str(
            r#"{
                "variant": "atl",
                "parameter_source": { "mode": "fixed", "field": "Occurrence_Parameter" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.variant.variant, Variant::Atl);
        assert!(config.variant.case_insensitive_rule);
        assert_eq!(
            config.variant.parameter_source,
            ParameterSource::fixed("Occurrence_Parameter")
        );
        assert_eq!(
            config.variant.parameter_source.field_for("Value_Parameter"),
            "Occurrence_Parameter"
        );
    }

    #[test]
    fn conflicting_requested_variant_is_rejected() {
        let config = TuningConfig::from_json_str(r#"{ "variant": "atl" }"#).unwrap();
        assert!(config.ensure_variant(Variant::Atl).is_ok());

        let err = config.ensure_variant(Variant::Btl).unwrap_err();
        assert!(
            err.to_string().contains("'atl'"),
            "unexpected message: {err}"
        );
    }

    #[test]
    fn per_row_source_reads_parameter_type() {
        assert_eq!(
            ParameterSource::PerRow.field_for("Value_Parameter"),
            "Value_Parameter"
        );
    }
}
