//! # Calendar Extraction
//! Turns the raw calendar HTML into typed [`EconomicEvent`] records.
//!
//! Pure and deterministic; performs no I/O. The only hard failure is a
//! document without the calendar table. Individual rows that don't carry the
//! four mandatory cells are skipped so one malformed row never poisons the
//! batch.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::calendar::types::{EconomicEvent, Impact};
use crate::error::ExtractionError;

static TABLE_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table.calendar__table").unwrap());
static ROW_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("tr.calendar__row").unwrap());
static TIME_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("td.calendar__time").unwrap());
static CURRENCY_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td.calendar__currency").unwrap());
static EVENT_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("td.calendar__event").unwrap());
static IMPACT_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("td.calendar__impact").unwrap());
static ACTUAL_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("td.calendar__actual").unwrap());
static FORECAST_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td.calendar__forecast").unwrap());
static PREVIOUS_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td.calendar__previous").unwrap());

// Impact markers inside the impact cell. High wins over Medium.
static HIGH_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("span.high").unwrap());
static MEDIUM_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("span.medium").unwrap());

/// Extract all calendar events from the document, in document order.
///
/// An empty vector is a valid result; absence of the calendar table is not.
pub fn extract_events(html: &str) -> Result<Vec<EconomicEvent>, ExtractionError> {
    let doc = Html::parse_document(html);
    let table = doc
        .select(&TABLE_SEL)
        .next()
        .ok_or(ExtractionError::TableNotFound)?;

    Ok(table.select(&ROW_SEL).filter_map(parse_row).collect())
}

/// Parse one candidate row; `None` marks a row to skip.
fn parse_row(row: ElementRef) -> Option<EconomicEvent> {
    let time = cell_text(row, &TIME_SEL)?;
    let currency = cell_text(row, &CURRENCY_SEL)?;
    let title = cell_text(row, &EVENT_SEL)?;
    let impact_cell = row.select(&IMPACT_SEL).next()?;

    Some(EconomicEvent {
        time,
        currency,
        title,
        impact: classify_impact(impact_cell),
        actual: cell_text(row, &ACTUAL_SEL),
        forecast: cell_text(row, &FORECAST_SEL),
        previous: cell_text(row, &PREVIOUS_SEL),
    })
}

/// Trimmed text of the first cell matching `sel`. A missing cell and a
/// present-but-blank cell both map to `None`, never `Some("")`.
fn cell_text(row: ElementRef, sel: &Selector) -> Option<String> {
    row.select(sel)
        .next()
        .map(|cell| cell.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
}

fn classify_impact(cell: ElementRef) -> Impact {
    if cell.select(&HIGH_SEL).next().is_some() {
        Impact::High
    } else if cell.select(&MEDIUM_SEL).next().is_some() {
        Impact::Medium
    } else {
        Impact::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap_rows(rows: &str) -> String {
        format!(
            "<html><body><table class=\"calendar__table\">{rows}</table></body></html>"
        )
    }

    fn row(time: &str, currency: &str, title: &str, impact_span: &str) -> String {
        format!(
            "<tr class=\"calendar__row\">\
               <td class=\"calendar__time\">{time}</td>\
               <td class=\"calendar__currency\">{currency}</td>\
               <td class=\"calendar__impact\">{impact_span}</td>\
               <td class=\"calendar__event\">{title}</td>\
               <td class=\"calendar__actual\"></td>\
               <td class=\"calendar__forecast\"></td>\
               <td class=\"calendar__previous\"></td>\
             </tr>"
        )
    }

    #[test]
    fn missing_table_is_a_hard_failure() {
        let err = extract_events("<html><body><p>maintenance</p></body></html>").unwrap_err();
        assert!(matches!(err, ExtractionError::TableNotFound));
    }

    #[test]
    fn empty_table_yields_empty_batch() {
        let events = extract_events(&wrap_rows("")).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn impact_markers_map_high_medium_low() {
        let rows = [
            row("8:30am", "USD", "Non-Farm Payrolls", "<span class=\"high\"></span>"),
            row("9:00am", "EUR", "German Factory Orders", "<span class=\"medium\"></span>"),
            row("10:00am", "GBP", "Housing Survey", ""),
        ]
        .concat();
        let events = extract_events(&wrap_rows(&rows)).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].impact, Impact::High);
        assert_eq!(events[1].impact, Impact::Medium);
        assert_eq!(events[2].impact, Impact::Low);
    }

    #[test]
    fn high_marker_wins_when_both_markers_present() {
        let rows = row(
            "8:30am",
            "USD",
            "CPI m/m",
            "<span class=\"medium\"></span><span class=\"high\"></span>",
        );
        let events = extract_events(&wrap_rows(&rows)).unwrap();
        assert_eq!(events[0].impact, Impact::High);
    }

    #[test]
    fn blank_mandatory_cell_skips_only_that_row() {
        let rows = [
            row("8:30am", "  ", "Trade Balance", ""),
            row("9:00am", "JPY", "BOJ Outlook Report", ""),
        ]
        .concat();
        let events = extract_events(&wrap_rows(&rows)).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].currency, "JPY");
    }

    #[test]
    fn blank_optional_cells_become_none_not_empty_string() {
        let rows = row("8:30am", "USD", "Retail Sales m/m", "");
        let events = extract_events(&wrap_rows(&rows)).unwrap();
        assert_eq!(events[0].actual, None);
        assert_eq!(events[0].forecast, None);
        assert_eq!(events[0].previous, None);
    }

    #[test]
    fn text_fields_are_trimmed() {
        let rows = "<tr class=\"calendar__row\">\
            <td class=\"calendar__time\">  2:00pm </td>\
            <td class=\"calendar__currency\"> USD  </td>\
            <td class=\"calendar__impact\"><span class=\"high\"></span></td>\
            <td class=\"calendar__event\">  FOMC Statement  </td>\
            <td class=\"calendar__actual\">  5.50%  </td>\
            <td class=\"calendar__forecast\"></td>\
            <td class=\"calendar__previous\"></td>\
          </tr>";
        let events = extract_events(&wrap_rows(rows)).unwrap();
        assert_eq!(events[0].time, "2:00pm");
        assert_eq!(events[0].currency, "USD");
        assert_eq!(events[0].title, "FOMC Statement");
        assert_eq!(events[0].actual.as_deref(), Some("5.50%"));
    }
}
