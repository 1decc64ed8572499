mod common;

use wishcalc::{
    core::services::{MoveDirection, MoveDistance},
    core::ItemDraft,
    domain::Item,
};

use common::setup_session;

#[test]
fn editing_flow_keeps_derived_values_current() {
    let (mut session, _dir) = setup_session();
    session.set_total_cash(300);

    let laptop = session.append(None, Item::new("Laptop", 250)).unwrap();
    let bag = session.append(None, Item::new("Bag", 80)).unwrap();
    assert_eq!(session.list().find(bag).unwrap().derived.need_cash, Some(30));

    assert!(session
        .move_item(bag, MoveDirection::Up, MoveDistance::OneStep)
        .unwrap());
    assert_eq!(session.list().find(bag).unwrap().derived.need_cash, Some(0));
    assert_eq!(session.list().find(laptop).unwrap().derived.need_cash, Some(30));
    assert!(!session.can_move(bag, MoveDirection::Up));
}

#[test]
fn purchase_removal_spends_cash() {
    let (mut session, _dir) = setup_session();
    session.set_total_cash(300);
    let laptop = session.append(None, Item::new("Laptop", 250)).unwrap();
    session.append(None, Item::new("Bag", 80)).unwrap();

    let removed = session.remove(laptop, true).unwrap();
    assert_eq!(removed.name, "Laptop");
    assert_eq!(session.list().total_cash, 50);
    assert_eq!(session.list().items[0].derived.need_cash, Some(30));
}

#[test]
fn drafts_create_and_update_items() {
    let (mut session, _dir) = setup_session();
    let draft = ItemDraft {
        name: "  Desk   lamp ".into(),
        cost: "19.6".into(),
        quantity: "2".into(),
        urls: vec![("https://lamp.example".into(), "".into()), ("".into(), "dropped".into())],
        importance: 9,
        ..ItemDraft::default()
    };
    let id = session.insert_draft(None, None, &draft).unwrap();
    let item = session.list().find(id).unwrap();
    assert_eq!(item.name, "Desk lamp");
    assert_eq!(item.cost, 20);
    assert_eq!(item.derived.sum, 40);
    assert_eq!(item.urls.len(), 1);
    assert_eq!(item.importance.level(), 4);

    let mut edit = ItemDraft::from_item(item);
    edit.cost = "".into();
    session.update_from_draft(id, &edit).unwrap();
    let item = session.list().find(id).unwrap();
    assert_eq!(item.cost, 0);
    assert_eq!(item.derived.need_cash, None);
}

#[test]
fn nested_inserts_roll_up_into_groups() {
    let (mut session, _dir) = setup_session();
    let group = session.append(None, Item::new("Kitchen", 0)).unwrap();
    let pot = session.insert(Some(group), None, Item::new("Pot", 40)).unwrap();
    session.insert(Some(group), Some(pot), Item::new("Pan", 35)).unwrap();

    let kitchen = session.list().find(group).unwrap();
    assert_eq!(kitchen.cost, 75);
    assert_eq!(kitchen.children[1].name, "Pan");
    assert_eq!(session.totals().item_count, 3);
}

#[test]
fn cart_flags_roll_up_to_totals() {
    let (mut session, _dir) = setup_session();
    session.set_total_cash(100);
    let paid = session.append(None, Item::new("Paid", 70)).unwrap();
    let rest = session.append(None, Item::new("Rest", 100)).unwrap();

    session.set_in_cart(paid, true).unwrap();
    session.set_paid(paid, true).unwrap();
    assert!(session.set_paid(rest, true).is_err());

    let totals = session.totals();
    assert_eq!(totals.in_cart_count, 1);
    assert_eq!(totals.in_cart_sum, 70);
    assert_eq!(session.list().find(rest).unwrap().derived.need_cash, Some(0));
}
