//! Plain-text location report

use chrono::Utc;

use crate::dashboard::DashboardSnapshot;

/// Report for the current selection; `None` until a reading has been applied
pub fn render_report(snapshot: &DashboardSnapshot) -> Option<String> {
    let location = snapshot.location.as_ref()?;
    let reading = snapshot.reading.as_ref()?;
    let assessment = snapshot.assessment.as_ref()?;

    let mut lines = vec![
        "FloodLens Report".to_string(),
        format!("Location : {}", location.display_name),
        format!("Lat,Lng  : {:.4}, {:.4}", location.lat, location.lng),
        format!("Elevation: {}", reading.elevation),
        format!("Rainfall : {} mm", reading.rainfall_today),
        format!("Risk     : {}", assessment.label),
        format!("Reason   : {}", assessment.reason),
    ];
    if let Some(explanation) = &snapshot.explanation {
        lines.push(String::new());
        lines.push("AI Explanation:".to_string());
        lines.push(explanation.clone());
    }
    lines.push(String::new());
    lines.push(format!("Generated: {}", Utc::now().to_rfc3339()));

    let mut report = lines.join("\n");
    report.push('\n');
    Some(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::DashboardState;
    use flood_risk::{Acquisition, Elevation, Location, Reading};

    #[tokio::test]
    async fn test_report_lines() {
        let dashboard = DashboardState::new();
        let ticket = dashboard.begin_selection(25.594_12, 85.137_61).await;
        dashboard
            .complete_selection(
                ticket,
                Acquisition {
                    location: Location::new(25.594_12, 85.137_61, "Patna"),
                    reading: Reading::from_daily(Elevation::Meters(45.0), &[72.0]),
                },
            )
            .await;

        let report = render_report(&dashboard.snapshot().await).unwrap();
        assert!(report.starts_with("FloodLens Report\n"));
        assert!(report.contains("Location : Patna"));
        assert!(report.contains("Lat,Lng  : 25.5941, 85.1376"));
        assert!(report.contains("Elevation: 45 m"));
        assert!(report.contains("Rainfall : 72 mm"));
        assert!(report.contains("Risk     : High"));
        assert!(!report.contains("AI Explanation"));
        assert!(report.ends_with('\n'));
    }

    #[tokio::test]
    async fn test_report_includes_explanation() {
        let dashboard = DashboardState::new();
        let ticket = dashboard.begin_selection(1.0, 2.0).await;
        dashboard
            .complete_selection(
                ticket,
                Acquisition {
                    location: Location::new(1.0, 2.0, "Somewhere"),
                    reading: Reading::from_daily(Elevation::Unavailable, &[5.0]),
                },
            )
            .await;
        let (ticket, _) = dashboard.begin_explanation().await.unwrap();
        dashboard.complete_explanation(ticket, "Low risk.".into()).await;

        let report = render_report(&dashboard.snapshot().await).unwrap();
        assert!(report.contains("Elevation: Unavailable"));
        assert!(report.contains("\nAI Explanation:\nLow risk.\n"));
    }

    #[tokio::test]
    async fn test_no_report_while_loading() {
        let dashboard = DashboardState::new();
        assert!(render_report(&dashboard.snapshot().await).is_none());

        dashboard.begin_selection(1.0, 1.0).await;
        assert!(render_report(&dashboard.snapshot().await).is_none());
    }
}
