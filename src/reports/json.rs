use crate::Result;
use core::fmt::Write;
use serde::Serialize;

pub fn generate<T: Serialize, W: Write>(value: &T, writer: &mut W) -> Result<()> {
    writeln!(writer, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::Report;
    use crate::reconcile::RankedEntry;

    #[test]
    fn test_live_report() {
        let report = Report::live(vec![RankedEntry::new("172", 4)], "records#0/items");
        let mut out = String::new();
        generate(&report, &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["data"][0]["key"], "172");
        assert_eq!(value["data"][0]["count"], 4);
        assert_eq!(value["source"]["kind"], "live");
        assert_eq!(value["source"]["strategy"], "records#0/items");
    }

    #[test]
    fn test_degraded_report_lists_attempts() {
        let report = Report::degraded(0_u64, Vec::new());
        let mut out = String::new();
        generate(&report, &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["source"]["kind"], "degraded");
        assert!(value["source"]["attempts"].as_array().unwrap().is_empty());
    }
}
