//! Static registration through the inventory-backed collection.

#![cfg(feature = "auto_register")]

use core::any::{Any, TypeId};

use sermeta::introspect::{
    Introspect, MemberTable, MemberTableCell, NativeIntrospector, TypeIntrospector,
};
use sermeta::{info::MemberInfo, submit_introspect};

struct Session {
    token: String,
}

impl Introspect for Session {
    fn member_table() -> &'static MemberTable {
        static CELL: MemberTableCell = MemberTableCell::new();
        CELL.get_or_init(|| {
            MemberTable::of::<Session>(vec![MemberInfo::field::<Session, String>(
                "token",
                |i| i.downcast_ref::<Session>().map(|s| &s.token as &dyn Any),
            )])
        })
    }
}

submit_introspect!(Session);

#[test]
fn auto_register_collects_submitted_types() {
    let introspector = NativeIntrospector::new();
    assert!(!introspector.contains(TypeId::of::<Session>()));

    assert!(introspector.auto_register());
    assert!(introspector.contains(TypeId::of::<Session>()));

    let members = introspector
        .enumerate_members(TypeId::of::<Session>())
        .unwrap();
    assert_eq!(members[0].name(), "token");

    // Repeated calls are cheap and insert no duplicates.
    assert!(introspector.auto_register());
    assert_eq!(introspector.len(), 1);
}
