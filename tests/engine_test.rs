use ordertalk::menu::{Size, StaticMenuCatalog};
use ordertalk::mutator::Action;
use ordertalk::processor::OrderProcessor;
use ordertalk::store::InMemoryOrderStore;

fn processor() -> OrderProcessor {
    OrderProcessor::new(
        Box::new(InMemoryOrderStore::new()),
        Box::new(StaticMenuCatalog::default()),
    )
}

#[test]
fn test_add_by_id_with_modifiers() {
    let mut p = processor();
    let out = p.process_command("add number two with cheddar and bacon");

    assert_eq!(out.action, Action::Add);
    assert_eq!(out.items.len(), 1);
    let line = &out.items[0];
    assert_eq!(line.id, 2);
    assert_eq!(line.quantity, 1);
    assert!(line.add.contains(&"Cheddar Cheese".to_string()));
    assert!(line.add.contains(&"Bacon".to_string()));
    assert!(line.remove.is_empty());
}

#[test]
fn test_add_by_name_with_size() {
    let mut p = processor();
    let out = p.process_command("add a large lemonade");

    assert_eq!(out.action, Action::Add);
    assert_eq!(out.items.len(), 1);
    let line = &out.items[0];
    assert_eq!(line.name, "Lemonade");
    assert_eq!(line.size, Some(Size::Large));
    assert_eq!(line.quantity, 1);
}

#[test]
fn test_add_then_partial_remove() {
    let mut p = processor();
    p.process_command("add two veggie burgers");
    let out = p.process_command("remove one veggie burger");

    assert_eq!(out.action, Action::Remove);
    assert_eq!(out.items.len(), 1);
    assert_eq!(out.items[0].id, 7);
    assert_eq!(out.items[0].quantity, 1);
}

#[test]
fn test_remove_with_modifier_constraint() {
    let mut p = processor();
    // two lines for the same id: one without ketchup, one plain
    p.process_command("add french fries without ketchup");
    p.process_command("add french fries");

    let out = p.process_command("remove french fries without ketchup");
    assert_eq!(out.action, Action::Remove);
    // the constrained line got decremented away, the plain one survives
    assert_eq!(out.items.len(), 1);
    assert!(out.items[0].remove.is_empty());
}

#[test]
fn test_clear_order() {
    let mut p = processor();
    p.process_command("add a cheeseburger");
    p.process_command("add a root beer");

    let out = p.process_command("clear order");
    assert_eq!(out.action, Action::Clear);
    assert!(out.items.is_empty());
}

#[test]
fn test_unrecognized_leaves_order_alone() {
    let mut p = processor();
    p.process_command("add a cheeseburger");
    let before = p.all();

    let out = p.process_command("gibberish command");
    assert_eq!(out.action, Action::Noop);
    assert_eq!(out.items, before);
}

#[test]
fn test_merge_on_repeated_add() {
    let mut p = processor();
    p.process_command("add a cheeseburger");
    let out = p.process_command("add a cheeseburger");

    assert_eq!(out.items.len(), 1);
    assert_eq!(out.items[0].quantity, 2);
}

#[test]
fn test_conversational_phrasing() {
    let mut p = processor();

    let out = p.process_command("Well, I'd like a couple of number sixteens, I think.");
    assert_eq!(out.action, Action::Add);
    assert_eq!(out.items.len(), 1);
    assert_eq!(out.items[0].id, 16); // Large coleslaw
    assert_eq!(out.items[0].quantity, 2);

    let out = p.process_command("could you give me a large iced tea");
    assert_eq!(out.action, Action::Add);
    assert_eq!(out.items.len(), 2);

    let out = p.process_command("y'all thinking you could add me a root beer");
    assert_eq!(out.action, Action::Add);
    assert_eq!(out.items.len(), 3);
}

#[test]
fn test_negation_forms() {
    let mut p = processor();

    let out = p.process_command("add a cheeseburger with no onions");
    assert_eq!(out.action, Action::Add);
    assert_eq!(out.items[0].remove, vec!["Onion".to_string()]);

    let out = p.process_command("add a bacon burger no pickles");
    assert_eq!(out.action, Action::Add);
    let bacon = out.items.iter().find(|l| l.id == 3).expect("bacon burger");
    assert_eq!(bacon.remove, vec!["Pickle".to_string()]);
}

#[test]
fn test_homophone_id_and_qty() {
    let mut p = processor();
    // "to" is an ASR homophone of "two" in id position
    let out = p.process_command("add number to");
    assert_eq!(out.action, Action::Add);
    assert_eq!(out.items[0].id, 2);

    p.process_command("add three veggie burgers");
    // and in quantity position on removes
    let out = p.process_command("remove to veggie burgers");
    assert_eq!(out.action, Action::Remove);
    let veggie = out.items.iter().find(|l| l.id == 7).expect("veggie burger");
    assert_eq!(veggie.quantity, 1);
}

#[test]
fn test_drink_topping_policy_applies() {
    let mut p = processor();
    let out = p.process_command("add a lemonade without ice");
    assert_eq!(out.action, Action::Add);
    assert_eq!(out.items[0].id, 45);
    assert_eq!(out.items[0].remove, vec!["Ice".to_string()]);
}

#[test]
fn test_full_conversation_flow() {
    let mut p = processor();

    p.process_command("add number one");
    p.process_command("add number one with onion");
    p.process_command("add a large sprite");
    assert_eq!(p.all().len(), 3);

    // decrement prefers the more specific (modified) line
    let out = p.process_command("remove number one with onion");
    assert_eq!(out.action, Action::Remove);
    assert_eq!(out.items.len(), 2);
    assert!(out.items.iter().all(|l| l.add.is_empty()));

    let out = p.process_command("new order");
    assert_eq!(out.action, Action::Clear);
    assert!(out.items.is_empty());
}
