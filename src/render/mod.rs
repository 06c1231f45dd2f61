//! Sheet document rendering
//!
//! The renderer turns one sheet's payload into a printable document. It is
//! a pure function of (generation code, sheet number, payload): no clocks,
//! no I/O, so the same sheet always renders to the same bytes.

use crate::domain::ids::GenerationCode;
use crate::domain::payload::{Card, SheetPayload, CARDS_PER_SHEET, GRID_SIZE};
use crate::domain::Result;

/// Renders one sheet into a document
///
/// Implementations must be deterministic and side-effect free; the export
/// worker relies on that to make archives reproducible.
pub trait SheetRenderer: Send + Sync {
    /// Render a sheet document
    ///
    /// # Arguments
    ///
    /// * `code` - Generation code printed on the sheet
    /// * `sheet_number` - Ordinal of the sheet within its generation
    /// * `payload_json` - Serialized sheet payload
    fn render(&self, code: &GenerationCode, sheet_number: u32, payload_json: &str)
        -> Result<Vec<u8>>;

    /// File extension for rendered documents, without the dot
    fn extension(&self) -> &'static str;
}

/// Self-contained HTML sheet renderer
///
/// Lays out the four cards in a 2x2 table under a header carrying the
/// generation code and sheet number. A card slot whose payload is missing
/// or malformed renders as an explicit placeholder instead of failing the
/// whole sheet.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlSheetRenderer;

impl HtmlSheetRenderer {
    /// Create a new renderer
    pub fn new() -> Self {
        Self
    }

    fn render_card(html: &mut String, card: Option<&Card>, code: &GenerationCode) {
        html.push_str("<td class=\"card\">");
        html.push_str("<div class=\"card-head\"><span>B I N G O</span>");
        html.push_str(&format!("<span class=\"gen\">Gen: {}</span></div>", code));

        match card {
            Some(card) => {
                html.push_str("<table class=\"grid\">");
                for row in 0..GRID_SIZE {
                    html.push_str("<tr>");
                    for col in 0..GRID_SIZE {
                        html.push_str(&format!("<td>{}</td>", card.grid[row][col]));
                    }
                    html.push_str("</tr>");
                }
                html.push_str("</table>");
            }
            None => {
                html.push_str("<p class=\"invalid\">Invalid card</p>");
            }
        }

        html.push_str("</td>");
    }
}

impl SheetRenderer for HtmlSheetRenderer {
    fn render(
        &self,
        code: &GenerationCode,
        sheet_number: u32,
        payload_json: &str,
    ) -> Result<Vec<u8>> {
        let payload: SheetPayload = serde_json::from_str(payload_json)?;

        let mut html = String::with_capacity(4096);
        html.push_str("<!DOCTYPE html><html><head><meta charset=\"utf-8\">");
        html.push_str(&format!(
            "<title>Tombola {} #{:04}</title>",
            code, sheet_number
        ));
        html.push_str(
            "<style>\
             body{font-family:sans-serif;margin:18px}\
             .header{display:flex;justify-content:space-between;font-weight:600}\
             .cards{width:100%;border-spacing:8px}\
             .card{border:1px solid #000;padding:8px;vertical-align:top;width:50%}\
             .card-head{display:flex;justify-content:space-between;font-weight:600}\
             .grid{width:100%;border-collapse:collapse;margin-top:6px}\
             .grid td{border:1px solid #000;text-align:center;height:26px}\
             .invalid{color:#f99}\
             </style></head><body>",
        );
        html.push_str(&format!(
            "<div class=\"header\"><span>Tombola &bull; Gen: {}</span>\
             <span>Sheet #{}</span></div>",
            code, sheet_number
        ));

        // 2x2 layout for the four cards
        html.push_str("<table class=\"cards\">");
        for pair in 0..CARDS_PER_SHEET / 2 {
            html.push_str("<tr>");
            Self::render_card(&mut html, payload.cards.get(pair * 2), code);
            Self::render_card(&mut html, payload.cards.get(pair * 2 + 1), code);
            html.push_str("</tr>");
        }
        html.push_str("</table></body></html>");

        Ok(html.into_bytes())
    }

    fn extension(&self) -> &'static str {
        "html"
    }
}
