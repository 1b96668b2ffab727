//! List renderer: one element per line in original order.

use crate::value::Value;

use super::limit::RowLimit;
use super::NEWLINE;

/// Same counting policy as the dictionary renderer: the separator newline is
/// emitted and counted before the cap check, so truncation bites from the
/// second element on and a truncated list ends with its separator.
pub(super) fn render(items: &[Value], limit: &mut RowLimit) -> String {
    let mut out = String::new();
    let mut emitted = 0;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(NEWLINE);
            emitted += 1;
        }
        if limit.should_stop(emitted) {
            limit.mark_exceeded();
            return out;
        }
        out.push_str(&item.to_string());
    }
    out
}
