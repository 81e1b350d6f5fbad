//! Load-failure panel shown instead of the visualizations.

use crate::escape;

const PANEL_STYLE: &str =
    "background-color: #fff3cd; color: #856404; padding: 15px; border-radius: 5px; margin-top: 20px;";

/// The warning panel naming the error and every expected data location.
#[must_use]
pub fn error_panel(message: &str, locations: &[String]) -> String {
    let mut html = format!(
        "<div class=\"error-message\" style=\"{PANEL_STYLE}\">\n<p><strong>Error loading data:</strong> {}</p>\n<p>Please check that the data files are available in the correct location:</p>\n<ul>\n",
        escape(message)
    );
    for location in locations {
        html.push_str(&format!("<li>{}</li>\n", escape(location)));
    }
    html.push_str("</ul>\n</div>");
    html
}

/// A complete page whose visualization container holds only the panel.
#[must_use]
pub fn error_page(message: &str, locations: &[String]) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>Massachusetts School District Enrollment</title>\n</head>\n<body>\n<div id=\"visualizations\">\n{}\n</div>\n</body>\n</html>\n",
        error_panel(message, locations)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_both_files() {
        let html = error_page(
            "Failed to read data/SCHOOLDISTRICTS_POLY.json: No such file",
            &[
                "data/SCHOOLDISTRICTS_POLY.json".to_string(),
                "data/Cleaned_Enrollment_Data.csv".to_string(),
            ],
        );
        assert!(html.contains("<strong>Error loading data:</strong> Failed to read"));
        assert!(html.contains("<li>data/SCHOOLDISTRICTS_POLY.json</li>"));
        assert!(html.contains("<li>data/Cleaned_Enrollment_Data.csv</li>"));
        assert!(html.contains("#fff3cd"));
        assert!(html.contains("#856404"));
        assert!(!html.contains("<svg"));
    }

    #[test]
    fn escapes_the_message() {
        let panel = error_panel("<bad>", &[]);
        assert!(panel.contains("&lt;bad&gt;"));
        assert!(panel.contains("<ul>\n</ul>"));
    }
}
