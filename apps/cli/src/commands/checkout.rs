//! The checkout command: one complete sale, start to finish.
//!
//! Build the cart (reserving stock), resolve payment, finalize, commit
//! everything in one all-or-nothing write, then print and save the
//! invoice. Any failure before commit leaves the data directory exactly
//! as it was.

use std::fs;

use smartmart_core::cart::{CartSession, CustomerLabel};
use smartmart_core::invoice;
use smartmart_core::payment::PaymentDeclaration;
use smartmart_core::{CoreError, ValidationError};
use smartmart_store::StoreResult;
use tracing::info;

use crate::args::{CheckoutArgs, PayMethod};
use crate::commands::Context;

pub fn run(ctx: &Context, args: CheckoutArgs) -> StoreResult<()> {
    let mut state = ctx.load_state()?;

    let mut cart = CartSession::new();
    cart.set_customer(CustomerLabel::new(&args.customer, args.city.as_deref())?)?;

    for spec in &args.items {
        cart.add_item(
            &mut state.inventory,
            spec.product_id,
            spec.quantity,
            spec.discount,
        )?;
    }
    for spec in &args.barcodes {
        let product_id = state
            .inventory
            .find_by_barcode(&spec.barcode)
            .map(|p| p.product_id)
            .ok_or_else(|| {
                CoreError::Validation(ValidationError::InvalidFormat {
                    field: "barcode".to_string(),
                    reason: format!("no product with barcode '{}'", spec.barcode),
                })
            })?;
        cart.add_item(&mut state.inventory, product_id, spec.quantity, spec.discount)?;
    }
    cart.apply_order_discount(args.order_discount)?;

    let declaration = match args.pay {
        PayMethod::Cash => PaymentDeclaration::Cash {
            reference: args.reference.clone(),
        },
        PayMethod::Card => PaymentDeclaration::Card {
            reference: args.reference.clone(),
        },
        PayMethod::Upi => PaymentDeclaration::Upi {
            reference: args.reference.clone(),
        },
        PayMethod::Split => {
            let first_amount = args.split_amount.ok_or_else(|| {
                CoreError::Validation(ValidationError::Required {
                    field: "split-amount".to_string(),
                })
            })?;
            PaymentDeclaration::Split {
                first_method: args.split_method.clone(),
                first_amount,
            }
        }
    };

    let order = cart.finalize(declaration, &mut state.ledger, &mut state.loyalty)?;

    // The one commit point: order, stock delta, and loyalty land together.
    ctx.store.commit(&state)?;
    info!(
        order_id = order.order_id,
        total = %order.total(),
        customer = %order.customer,
        "order finalized"
    );

    let text = invoice::render_text(&order);
    let path = args.invoice_dir.join(invoice::invoice_file_name(order.order_id));
    fs::write(&path, &text)?;

    print!("{text}");
    println!("invoice saved to {}", path.display());
    println!(
        "loyalty balance for {}: {} points",
        order.customer_base_name(),
        state.loyalty.balance(order.customer_base_name())
    );
    Ok(())
}
