//! Lifecycle, catalog and component behavior of the registry

use assert_matches::assert_matches;
use rwa_registry::{
    AccountId, Address, Component, ComponentName, DealId, DealStatus, RegistryError, RegistryFact,
    RwaRegistry, Variant,
};

fn admin() -> AccountId {
    AccountId::from_bytes([0xad; 20])
}

fn outsider() -> AccountId {
    AccountId::from_bytes([0x0e; 20])
}

fn deal(text: &str) -> DealId {
    DealId::new(text).unwrap()
}

fn name(text: &str) -> ComponentName {
    ComponentName::new(text).unwrap()
}

fn addr(byte: u8) -> Address {
    Address::from_bytes([byte; 20])
}

fn registry() -> RwaRegistry {
    RwaRegistry::with_defaults(admin()).unwrap()
}

#[test]
fn unknown_deal_is_absent_everywhere() {
    let mut registry = registry();
    let id = deal("RWA404-A");

    assert!(!registry.has(&id));
    assert!(!registry.has_component(&id, &name("urn")));
    assert_matches!(
        registry.get_component(&id, &name("urn")),
        Err(RegistryError::DealDoesNotExist(d)) if d == id
    );
    assert!(registry.list_components(&id).unwrap_err().is_missing_deal());
    assert!(registry.list_component_names(&id).unwrap_err().is_missing_deal());
    assert!(registry.count_components(&id).unwrap_err().is_missing_deal());
    assert!(registry.finalize(&admin(), id).unwrap_err().is_missing_deal());
    assert!(registry.remove(&admin(), id).unwrap_err().is_missing_deal());
}

#[test]
fn component_writes_on_unknown_deal_are_not_active() {
    let mut registry = registry();
    let id = deal("RWA404-A");
    registry.take_facts();

    assert_eq!(
        registry.set_component(&admin(), id, name("urn"), addr(1), Variant(1)),
        Err(RegistryError::DealNotActive(id))
    );
    assert_eq!(
        registry.file(&admin(), id, name("jar"), addr(2), Variant(1)),
        Err(RegistryError::DealNotActive(id))
    );
    assert_eq!(
        registry.remove_component(&admin(), id, name("urn")),
        Err(RegistryError::DealNotActive(id))
    );
    assert!(registry.facts().is_empty());
    assert!(!registry.has(&id));
}

#[test]
fn adding_twice_fails() {
    let mut registry = registry();
    registry.add_deal(&admin(), deal("RWA001-A")).unwrap();
    assert_eq!(
        registry.add_deal(&admin(), deal("RWA001-A")),
        Err(RegistryError::DealAlreadyExists(deal("RWA001-A")))
    );
}

#[test]
fn added_deal_is_active_and_listed_once() {
    let mut registry = registry();
    registry.add_deal(&admin(), deal("RWA001-A")).unwrap();
    registry.add_deal(&admin(), deal("RWA002-A")).unwrap();

    assert_eq!(registry.status(&deal("RWA001-A")).0, DealStatus::Active);
    let listed = registry.list();
    assert_eq!(listed.iter().filter(|id| **id == deal("RWA001-A")).count(), 1);
    assert_eq!(registry.count(), 2);
    assert_eq!(registry.pos_to_id(1), Some(deal("RWA002-A")));
}

#[test]
fn finalized_deal_is_frozen() {
    let mut registry = registry();
    let id = deal("RWA003-A");
    registry
        .add_deal_with_components(&admin(), id, &[name("urn")], &[addr(1)], &[Variant(1)])
        .unwrap();
    registry.finalize(&admin(), id).unwrap();

    assert_eq!(registry.status(&id).0, DealStatus::Finalized);
    assert_eq!(
        registry.set_component(&admin(), id, name("jar"), addr(2), Variant(1)),
        Err(RegistryError::DealNotActive(id))
    );
    assert_eq!(
        registry.remove_component(&admin(), id, name("urn")),
        Err(RegistryError::DealNotActive(id))
    );
    assert_eq!(registry.finalize(&admin(), id), Err(RegistryError::DealNotActive(id)));
    assert_eq!(registry.remove(&admin(), id), Err(RegistryError::DealNotActive(id)));

    // Reads still work on finalized deals.
    assert_eq!(
        registry.get_component(&id, &name("urn")).unwrap(),
        Component::new(addr(1), 1u8)
    );
}

#[test]
fn unsupported_component_is_not_recorded() {
    let mut registry = registry();
    let id = deal("RWA004-A");
    registry.add_deal(&admin(), id).unwrap();

    assert!(!registry.list_supported_types().contains(&name("vault")));
    assert_eq!(
        registry.set_component(&admin(), id, name("vault"), addr(1), Variant(1)),
        Err(RegistryError::UnsupportedComponent(name("vault")))
    );
    assert!(!registry.has_component(&id, &name("vault")));
    assert_eq!(registry.count_components(&id).unwrap(), 0);
}

#[test]
fn set_component_updates_in_place() {
    let mut registry = registry();
    let id = deal("RWA005-A");
    registry.add_deal(&admin(), id).unwrap();

    registry
        .set_component(&admin(), id, name("urn"), addr(0xa), Variant(2))
        .unwrap();
    assert_eq!(
        registry.get_component(&id, &name("urn")).unwrap(),
        Component::new(addr(0xa), 2u8)
    );

    registry
        .set_component(&admin(), id, name("urn"), addr(0xb), Variant(5))
        .unwrap();
    assert_eq!(
        registry.get_component(&id, &name("urn")).unwrap(),
        Component::new(addr(0xb), 5u8)
    );
    assert_eq!(registry.list_component_names(&id).unwrap(), vec![name("urn")]);
}

#[test]
fn set_component_always_emits() {
    let mut registry = registry();
    let id = deal("RWA005-A");
    registry.add_deal(&admin(), id).unwrap();
    registry.take_facts();

    for _ in 0..2 {
        registry
            .set_component(&admin(), id, name("jar"), addr(3), Variant(1))
            .unwrap();
    }
    assert_eq!(registry.facts().len(), 2);
}

#[test]
fn missing_component_on_existing_deal() {
    let mut registry = registry();
    let id = deal("RWA006-A");
    registry.add_deal(&admin(), id).unwrap();
    assert_eq!(
        registry.get_component(&id, &name("jar")),
        Err(RegistryError::ComponentDoesNotExist {
            deal: id,
            name: name("jar"),
        })
    );
}

#[test]
fn removing_absent_component_is_not_an_error() {
    let mut registry = registry();
    let id = deal("RWA007-A");
    registry.add_deal(&admin(), id).unwrap();
    registry.remove_component(&admin(), id, name("token")).unwrap();
    assert_matches!(
        registry.facts().last().map(|e| &e.fact),
        Some(RegistryFact::ComponentRemoved { .. })
    );
}

#[test]
fn remove_requires_no_components() {
    let mut registry = registry();
    let id = deal("RWA008-A");
    registry
        .add_deal_with_components(&admin(), id, &[name("jar")], &[addr(1)], &[Variant(1)])
        .unwrap();
    assert_eq!(
        registry.remove(&admin(), id),
        Err(RegistryError::DealHasDanglingComponents(id))
    );
    assert!(registry.has(&id));
}

#[test]
fn removed_deal_can_be_added_again() {
    let mut registry = registry();
    let id = deal("RWA009-A");
    registry.add_deal(&admin(), id).unwrap();
    registry.remove(&admin(), id).unwrap();
    assert_eq!(registry.status(&id), (DealStatus::None, 0));
    registry.add_deal(&admin(), id).unwrap();
    assert!(registry.has(&id));
}

#[test]
fn batch_add_is_atomic() {
    let mut registry = registry();
    let id = deal("RWA010-A");
    let result = registry.add_deal_with_components(
        &admin(),
        id,
        &[name("urn"), name("jar")],
        &[addr(1), Address::ZERO],
        &[Variant(1), Variant(1)],
    );
    assert_eq!(result, Err(RegistryError::InvalidComponentAddress(name("jar"))));
    assert!(!registry.has(&id));
    assert!(registry.list().is_empty());
}

#[test]
fn batch_add_rejects_mismatched_lists() {
    let mut registry = registry();
    assert_matches!(
        registry.add_deal_with_components(
            &admin(),
            deal("RWA011-A"),
            &[name("urn"), name("jar")],
            &[addr(1), addr(2)],
            &[Variant(1)],
        ),
        Err(RegistryError::MismatchingComponentParams {
            names: 2,
            addresses: 2,
            variants: 1
        })
    );
}

#[test]
fn batch_add_with_existing_deal_fails_first() {
    let mut registry = registry();
    let id = deal("RWA012-A");
    registry.add_deal(&admin(), id).unwrap();
    assert_eq!(
        registry.add_deal_with_components(&admin(), id, &[name("urn")], &[], &[]),
        Err(RegistryError::DealAlreadyExists(id))
    );
}

#[test]
fn non_operators_are_rejected() {
    let mut registry = registry();
    let id = deal("RWA013-A");
    let unauthorized = Err(RegistryError::Unauthorized(outsider()));

    assert_eq!(registry.add_deal(&outsider(), id), unauthorized);
    assert_eq!(registry.rely(&outsider(), outsider()), unauthorized);
    assert_eq!(registry.deny(&outsider(), admin()), unauthorized);
    assert_eq!(
        registry.register_component_type(&outsider(), name("vault")),
        unauthorized
    );

    registry.add_deal(&admin(), id).unwrap();
    assert_eq!(
        registry.set_component(&outsider(), id, name("urn"), addr(1), Variant(1)),
        unauthorized
    );
    assert_eq!(registry.remove_component(&outsider(), id, name("urn")), unauthorized);
    assert_eq!(registry.finalize(&outsider(), id), unauthorized);
    assert_eq!(registry.remove(&outsider(), id), unauthorized);
}

#[test]
fn operators_can_be_granted_and_revoked() {
    let mut registry = registry();
    registry.rely(&admin(), outsider()).unwrap();
    assert!(registry.is_authorized(&outsider()));
    registry.add_deal(&outsider(), deal("RWA014-A")).unwrap();

    registry.deny(&outsider(), outsider()).unwrap();
    assert!(!registry.is_authorized(&outsider()));

    // The creator can revoke itself and strand the registry.
    registry.deny(&admin(), admin()).unwrap();
    assert!(registry.operators().is_empty());
    assert_eq!(
        registry.rely(&admin(), admin()),
        Err(RegistryError::Unauthorized(admin()))
    );
}

#[test]
fn catalog_defaults_then_custom_in_order() {
    let mut registry = registry();
    let defaults = registry.list_supported_types();
    assert_eq!(
        defaults.iter().map(ToString::to_string).collect::<Vec<_>>(),
        vec![
            "urn",
            "liquidationOracle",
            "outputConduit",
            "inputConduit",
            "jar",
            "jarInputConduit",
            "token"
        ]
    );

    registry.register_component_type(&admin(), name("vault")).unwrap();
    registry.register_component_type(&admin(), name("spotter")).unwrap();
    let all = registry.list_supported_types();
    assert_eq!(&all[..defaults.len()], defaults.as_slice());
    assert_eq!(&all[defaults.len()..], &[name("vault"), name("spotter")]);

    assert_eq!(
        registry.register_component_type(&admin(), name("urn")),
        Err(RegistryError::AlreadySupported(name("urn")))
    );
    assert!(registry.is_supported(&name("vault")));
}

#[test]
fn scenario_attach_detach_remove() {
    let mut registry = registry();
    let id = deal("RWA100-A");
    registry
        .add_deal_with_components(
            &admin(),
            id,
            &[name("urn"), name("jar")],
            &[addr(0xaa), addr(0xbb)],
            &[Variant(1), Variant(1)],
        )
        .unwrap();
    assert_eq!(
        registry.list_component_names(&id).unwrap(),
        vec![name("urn"), name("jar")]
    );

    registry.remove_component(&admin(), id, name("jar")).unwrap();
    assert_eq!(
        registry.remove(&admin(), id),
        Err(RegistryError::DealHasDanglingComponents(id))
    );
    registry.remove_component(&admin(), id, name("urn")).unwrap();
    registry.remove(&admin(), id).unwrap();
    assert!(!registry.has(&id));
}

#[test]
fn scenario_file_updates_single_field() {
    let mut registry = registry();
    let id = deal("X");
    registry
        .add_deal_with_components(
            &admin(),
            id,
            &[name("urn"), name("outputConduit")],
            &[addr(0xaa), addr(0xbb)],
            &[Variant(1), Variant(1)],
        )
        .unwrap();

    registry
        .file(&admin(), id, name("outputConduit"), addr(0xcc), Variant(1))
        .unwrap();

    assert_eq!(
        registry.get_component(&id, &name("outputConduit")).unwrap(),
        Component::new(addr(0xcc), 1u8)
    );
    assert_eq!(
        registry.get_component(&id, &name("urn")).unwrap(),
        Component::new(addr(0xaa), 1u8)
    );
    assert_eq!(
        registry.list_component_names(&id).unwrap(),
        vec![name("urn"), name("outputConduit")]
    );
}

#[test]
fn list_components_returns_values_in_order() {
    let mut registry = registry();
    let id = deal("RWA015-A");
    registry
        .add_deal_with_components(
            &admin(),
            id,
            &[name("token"), name("urn")],
            &[addr(1), addr(2)],
            &[Variant::opaque(88), Variant(3)],
        )
        .unwrap();
    let components = registry.list_components(&id).unwrap();
    assert_eq!(components.len(), 2);
    assert_eq!(components[0].name, name("token"));
    assert_eq!(components[0].variant, Variant::opaque(88));
    assert_eq!(components[1].address, addr(2));
}
