//! Process-wide system property table.
//!
//! Non-forked runs hand their declared properties to the booter through this
//! table. It is written only by [`apply_process_wide`].

use std::collections::BTreeMap;
use std::sync::{OnceLock, RwLock};

/// Global property table, created on first use.
static SYSTEM_PROPERTIES: OnceLock<RwLock<BTreeMap<String, String>>> = OnceLock::new();

fn table() -> &'static RwLock<BTreeMap<String, String>> {
    SYSTEM_PROPERTIES.get_or_init(|| RwLock::new(BTreeMap::new()))
}

/// Sets every property in the process-wide table, overwriting existing keys.
pub fn apply_process_wide<'a, I>(properties: I)
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    let mut table = table().write().unwrap_or_else(|poisoned| poisoned.into_inner());
    for (key, value) in properties {
        tracing::debug!(key = %key, value = %value, "setting process-wide system property");
        table.insert(key.clone(), value.clone());
    }
}

/// Returns the current value of a property.
pub fn get(key: &str) -> Option<String> {
    let table = table().read().unwrap_or_else(|poisoned| poisoned.into_inner());
    table.get(key).cloned()
}

/// Returns a copy of the whole table.
pub fn snapshot() -> BTreeMap<String, String> {
    table()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applied_properties_are_visible() {
        let props = BTreeMap::from([
            ("sysprops.test.a".to_string(), "1".to_string()),
            ("sysprops.test.b".to_string(), "2".to_string()),
        ]);
        apply_process_wide(&props);

        assert_eq!(get("sysprops.test.a").as_deref(), Some("1"));
        assert_eq!(snapshot().get("sysprops.test.b").map(String::as_str), Some("2"));
    }

    #[test]
    fn later_application_overwrites() {
        let first = BTreeMap::from([("sysprops.test.c".to_string(), "old".to_string())]);
        let second = BTreeMap::from([("sysprops.test.c".to_string(), "new".to_string())]);
        apply_process_wide(&first);
        apply_process_wide(&second);

        assert_eq!(get("sysprops.test.c").as_deref(), Some("new"));
    }
}
