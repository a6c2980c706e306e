use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Placeholder values for template filling, keyed by placeholder name.
pub type Metadata = BTreeMap<String, String>;

pub const M_ITEM_NR: &str = "item-nr";
pub const M_ITEM_ID: &str = "item-id";
pub const M_ITEM_TITLE: &str = "item-title";
pub const M_GROUP_ID: &str = "group-id";
pub const M_ROW_Y: &str = "y";
pub const M_BLOCK_ID: &str = "b";
pub const M_TARGET_ID: &str = "target-id";
pub const M_LAYER_KEY: &str = "layer-key";
pub const M_LAYER_NR: &str = "layer-nr";

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER
        .get_or_init(|| Regex::new(r"\{([A-Za-z0-9_-]+)\}").expect("Invalid placeholder regex"))
}

/// Replaces every `{name}` with its value from `data`.
///
/// Unknown placeholders are left as they are.
pub fn fill_template(template: &str, data: &Metadata) -> String {
    placeholder_regex()
        .replace_all(template, |caps: &Captures<'_>| match data.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}
