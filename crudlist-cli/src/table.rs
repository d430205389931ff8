//! Table output

use comfy_table::Attribute;
use comfy_table::Cell;
use comfy_table::ContentArrangement;
use comfy_table::Table;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use crudlist_lib::view::ListOutput;

/// Renders a list page with its pager line.
pub fn render(output: &ListOutput) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            output
                .header()
                .into_iter()
                .map(|label| Cell::new(label).add_attribute(Attribute::Bold))
                .collect::<Vec<_>>(),
        );
    for cells in output.cells() {
        table.add_row(cells);
    }

    let mut text = table.to_string();
    if let Some(empty) = &output.empty_text {
        text.push('\n');
        text.push_str(empty);
    }
    if let Some(page) = &output.page {
        let (from, to) = page.range();
        text.push_str(&format!(
            "\n{from}-{to} of {} (page {}/{}, {} per page)",
            page.count,
            page.page + 1,
            page.page_count(),
            page.rows_per_page
        ));
    }
    text
}
