use super::*;
use std::str::FromStr;
use uuid::Uuid;

#[test]
fn test_typed_id_roundtrip() {
    let id = ReportId::new(42);
    assert_eq!(id.into_inner(), 42);
    assert_eq!(ReportId::from(42), id);
}

#[test]
fn test_typed_id_default_is_unassigned() {
    assert!(WorkspaceId::default().is_unassigned());
    assert!(!WorkspaceId::new(3).is_unassigned());
}

#[test]
fn test_typed_id_display() {
    assert_eq!(format!("{}", ContractorId::new(7)), "7");
}

#[test]
fn test_typed_id_from_str() {
    assert_eq!(CostId::from_str(" 15 ").unwrap(), CostId::new(15));
    assert!(CostId::from_str("fifteen").is_err());
}

#[test]
fn test_typed_id_serializes_transparently() {
    let json = serde_json::to_string(&BillingId::new(9)).unwrap();
    assert_eq!(json, "9");
}

#[test]
fn test_fact_id_display() {
    let uuid = Uuid::from_u128(1);
    assert_eq!(FactId::from_uuid(uuid).to_string(), uuid.to_string());
}
