//! Guidance for refreshing the carbon intensity table by hand.
//!
//! Carbon intensity has no single machine-readable source that covers every
//! region, so the table is never rewritten automatically.

/// An authoritative source of grid carbon intensity data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntensitySource {
    pub name: &'static str,
    /// `(label, value)` lines shown under the source name.
    pub details: &'static [(&'static str, &'static str)],
}

pub const INTENSITY_SOURCES: &[IntensitySource] = &[
    IntensitySource {
        name: "Cloud Carbon Footprint (CCF)",
        details: &[
            (
                "Repository",
                "https://github.com/cloud-carbon-footprint/cloud-carbon-coefficients",
            ),
            ("License", "Apache 2.0"),
            (
                "Data",
                "coefficients-aws-use.csv, coefficients-gcp-use.csv, coefficients-azure-use.csv",
            ),
            ("Field", "'GridEmissionsFactor' (kg CO2e per kWh)"),
        ],
    },
    IntensitySource {
        name: "EPA eGRID (US Regions)",
        details: &[
            ("URL", "https://www.epa.gov/egrid/download-data"),
            ("Data", "eGRID Year Data (Excel/CSV)"),
            (
                "Field",
                "'NERC Region' carbon intensity (lb CO2/MWh, convert to kg/kWh)",
            ),
        ],
    },
    IntensitySource {
        name: "Cloud Provider Sustainability Reports",
        details: &[
            ("Google Cloud", "https://cloud.google.com/sustainability/region-carbon"),
            ("Microsoft Azure", "https://www.microsoft.com/en-us/sustainability"),
            ("AWS", "Check regional sustainability data pages"),
        ],
    },
    IntensitySource {
        name: "electricityMap API (real-time data)",
        details: &[
            ("URL", "https://api.electricitymap.org/"),
            (
                "Note",
                "Requires API key, provides real-time carbon intensity by zone",
            ),
        ],
    },
];

/// Steps for applying new data to `carbon_intensity.json`.
pub const UPDATE_STEPS: [&str; 4] = [
    "Download data from the sources above",
    "Extract carbon intensity values (kg CO2 per kWh)",
    "Manually update carbon_intensity.json with new values",
    "Document the source and date in the 'notes' field",
];

/// Example entry in the expected format.
pub const EXAMPLE_ENTRY: &str = r#"{
  "us-east-1": {
    "region_name": "US East (N. Virginia)",
    "kg_co2_per_kwh": 0.448,
    "provider": "AWS",
    "notes": "EPA eGRID 2022 data, updated 2025-11"
  }
}"#;

/// Render the full guidance text.
pub fn render_carbon_guidance() -> String {
    let mut out = String::from(
        "Carbon intensity data should be updated from these authoritative sources:\n\n",
    );
    for (i, source) in INTENSITY_SOURCES.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, source.name));
        for (label, value) in source.details {
            out.push_str(&format!("   {label}: {value}\n"));
        }
        out.push('\n');
    }

    out.push_str("To update carbon_intensity.json:\n");
    for (i, step) in UPDATE_STEPS.iter().enumerate() {
        out.push_str(&format!("  {}. {step}\n", i + 1));
    }

    out.push_str("\nExample format:\n");
    for line in EXAMPLE_ENTRY.lines() {
        out.push_str(&format!("  {line}\n"));
    }

    out.push_str(
        "\nNote: Carbon intensity values change over time as grids add more renewables.\n\
         Recommend updating annually or when new data is published.\n",
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guidance_lists_every_source_in_order() {
        let text = render_carbon_guidance();
        let mut last = 0;
        for (i, source) in INTENSITY_SOURCES.iter().enumerate() {
            let heading = format!("{}. {}", i + 1, source.name);
            let at = text.find(&heading).expect("source heading present");
            assert!(at >= last, "{heading} out of order");
            last = at;
        }
    }

    #[test]
    fn guidance_includes_steps_and_example() {
        let text = render_carbon_guidance();
        assert!(text.contains("3. Manually update carbon_intensity.json with new values"));
        assert!(text.contains("\"kg_co2_per_kwh\": 0.448"));
    }

    #[test]
    fn example_entry_is_valid_json() {
        let parsed: serde_json::Value = serde_json::from_str(EXAMPLE_ENTRY).expect("valid JSON");
        assert_eq!(parsed["us-east-1"]["kg_co2_per_kwh"], 0.448);
    }
}
