use core::fmt::Write as _;

use heapless::String;

use crate::gyro::Heading;

pub const DEBUG_LINE_LEN: usize = 16;

/// Shown until the estimator is valid
pub const PLACEHOLDER: &str = "Init Gyro..";

/// Debug panel line, `Gyro` followed by the heading with one decimal in a
/// five wide field, or [`PLACEHOLDER`] while calibrating.
///
/// The trailing blanks overwrite leftovers of a longer previous line on
/// character displays that are not cleared between updates.
pub fn debug_line(heading: &Heading) -> String<DEBUG_LINE_LEN> {
    let mut line = String::new();

    if heading.valid {
        // "Gyro 359.9   " is the longest possible line, always fits
        let _ = write!(line, "Gyro {:5.1}   ", heading.degrees);
    } else {
        let _ = line.push_str(PLACEHOLDER);
    }

    line
}
