//! End-to-end flow: seed a catalog, run a checkout, commit, restart,
//! run another checkout, and check everything that crossed the
//! persistence boundary.

use smartmart_core::cart::{CartSession, CustomerLabel};
use smartmart_core::invoice;
use smartmart_core::money::{Money, Percent};
use smartmart_core::payment::PaymentDeclaration;
use smartmart_store::{DataStore, PosState};

fn checkout(
    state: &mut PosState,
    customer: &str,
    product_id: u64,
    qty: i64,
    line_disc: f64,
    order_disc: f64,
) -> u64 {
    let mut cart = CartSession::new();
    cart.set_customer(CustomerLabel::new(customer, None).unwrap())
        .unwrap();
    cart.add_item(
        &mut state.inventory,
        product_id,
        qty,
        Percent::from_percent(line_disc),
    )
    .unwrap();
    cart.apply_order_discount(Percent::from_percent(order_disc))
        .unwrap();
    cart.finalize(
        PaymentDeclaration::Cash {
            reference: String::new(),
        },
        &mut state.ledger,
        &mut state.loyalty,
    )
    .unwrap()
    .order_id
}

#[test]
fn orders_survive_restart_with_monotonic_ids() {
    let dir = tempfile::tempdir().unwrap();
    let store = DataStore::open(dir.path()).unwrap();

    // shift one: seed and sell
    let mut state = store.load().unwrap();
    let pid = state
        .inventory
        .add(
            "Basmati Rice (5kg)",
            "Grocery",
            50,
            Money::from_rupees(1200),
            "Sharma Supplies",
            None,
        )
        .unwrap();
    let first = checkout(&mut state, "Asha", pid, 2, 10.0, 5.0);
    store.commit(&state).unwrap();
    assert_eq!(first, 1000);

    // shift two: fresh process, same directory
    let mut state = store.load().unwrap();
    assert_eq!(state.inventory.quantity(pid), Some(48));
    assert_eq!(state.loyalty.balance("Asha"), 20);

    let second = checkout(&mut state, "Ravi", pid, 1, 0.0, 0.0);
    store.commit(&state).unwrap();
    assert_eq!(second, 1001);

    // final reload: both orders, correct totals, reproducible invoice
    let state = store.load().unwrap();
    assert_eq!(state.ledger.len(), 2);
    assert_eq!(state.inventory.quantity(pid), Some(47));

    let order = state.ledger.get(1000).unwrap();
    assert_eq!(order.total_cents, 205200);
    let text = invoice::render_text(order);
    assert!(text.starts_with("INVOICE - Order #1000\n"));
    assert!(text.contains("TOTAL (Rs.): 2052.00"));

    assert_eq!(state.ledger.total_sales().cents(), 205200 + 120000);
    assert_eq!(state.ledger.top_customers(1)[0].0, "Asha");
}
