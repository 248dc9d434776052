//! Output naming and type labels.

use rand::Rng;
use regex::Regex;
use std::sync::LazyLock;

/// Characters used in the random part of generated names.
const TOKEN_CHARS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of the random token in generated names.
pub const TOKEN_LEN: usize = 12;

/// Regex matching a module path prefix such as `alloc::vec::`.
static MODULE_PATH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:[A-Za-z_][A-Za-z0-9_]*::)+").unwrap());

/// Random lowercase alphanumeric token of [`TOKEN_LEN`] characters.
pub fn make_token() -> String {
    let mut rng = rand::rng();
    (0..TOKEN_LEN)
        .map(|_| TOKEN_CHARS[rng.random_range(0..TOKEN_CHARS.len())] as char)
        .collect()
}

/// Local time formatted as `YYYYMMDDHHMMSS`.
pub fn timestamp() -> String {
    chrono::Local::now().format("%Y%m%d%H%M%S").to_string()
}

/// Collision-resistant file name: `presentation_<token>_<timestamp>.slides.html`.
pub fn default_presentation_name() -> String {
    format!("presentation_{}_{}.slides.html", make_token(), timestamp())
}

/// Type name of `T` without module paths, e.g. `Vec<String>` for
/// `alloc::vec::Vec<alloc::string::String>`.
pub fn short_type_name<T: ?Sized>() -> String {
    MODULE_PATH_REGEX
        .replace_all(std::any::type_name::<T>(), "")
        .into_owned()
}

/// Short type name of the value's type.
pub fn short_type_name_of<T: ?Sized>(_value: &T) -> String {
    short_type_name::<T>()
}
