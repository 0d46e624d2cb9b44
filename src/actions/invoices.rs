//! Invoice actions: create, update, delete.

use tracing::{debug, error, info};

use super::{
    messages, ActionContext, ActionError, ActionOutcome, FormState, RejectReason, INVOICES_PATH,
};
use crate::db::{self, InvoiceChanges, NewInvoice};
use crate::schema::{parse_invoice_form, FormData};

pub async fn create_invoice(
    ctx: &ActionContext,
    prior: &FormState,
    form: &FormData,
) -> Result<ActionOutcome, ActionError> {
    let input = match parse_invoice_form(form) {
        Ok(input) => input,
        Err(errors) => {
            debug!(resubmitted = !prior.is_empty(), "Invoice form failed validation");
            return Ok(ActionOutcome::rejected(
                RejectReason::Validation,
                FormState::with_errors(errors, messages::CREATE_MISSING_FIELDS),
            ));
        }
    };

    let invoice = NewInvoice {
        amount_cents: input.amount_in_cents(),
        customer_id: input.customer_id,
        status: input.status,
        date: ctx.clock.today().format("%Y-%m-%d").to_string(),
    };

    if let Err(e) = db::insert_invoice(&ctx.db, &invoice).await {
        error!(error = %e, customer_id = %invoice.customer_id, "Failed to create invoice");
        return Ok(ActionOutcome::rejected(
            RejectReason::Persistence,
            FormState::message(messages::CREATE_DB_ERROR),
        ));
    }

    info!(
        customer_id = %invoice.customer_id,
        amount = invoice.amount_cents,
        status = %invoice.status,
        "Invoice created"
    );

    ctx.revalidator.revalidate_path(INVOICES_PATH);
    Ok(ActionOutcome::redirect(INVOICES_PATH))
}

/// Replace customer, amount and status of invoice `id`. An unknown id
/// updates nothing and still redirects.
pub async fn update_invoice(
    ctx: &ActionContext,
    id: &str,
    form: &FormData,
) -> Result<ActionOutcome, ActionError> {
    let input = match parse_invoice_form(form) {
        Ok(input) => input,
        Err(errors) => {
            debug!(invoice_id = %id, "Invoice edit failed validation");
            return Ok(ActionOutcome::rejected(
                RejectReason::Validation,
                FormState::with_errors(errors, messages::UPDATE_MISSING_FIELDS),
            ));
        }
    };

    let changes = InvoiceChanges {
        amount_cents: input.amount_in_cents(),
        customer_id: input.customer_id,
        status: input.status,
    };

    match db::update_invoice(&ctx.db, id, &changes).await {
        Ok(0) => debug!(invoice_id = %id, "Update matched no invoice"),
        Ok(_) => info!(invoice_id = %id, "Invoice updated"),
        Err(e) => {
            error!(error = %e, invoice_id = %id, "Failed to update invoice");
            return Ok(ActionOutcome::rejected(
                RejectReason::Persistence,
                FormState::message(messages::UPDATE_DB_ERROR),
            ));
        }
    }

    ctx.revalidator.revalidate_path(INVOICES_PATH);
    Ok(ActionOutcome::redirect(INVOICES_PATH))
}

/// Delete invoice `id`. Deleting an id that does not exist succeeds silently.
pub async fn delete_invoice(ctx: &ActionContext, id: &str) -> Result<ActionOutcome, ActionError> {
    match db::delete_invoice(&ctx.db, id).await {
        Ok(0) => debug!(invoice_id = %id, "Delete matched no invoice"),
        Ok(_) => info!(invoice_id = %id, "Invoice deleted"),
        Err(e) => {
            error!(error = %e, invoice_id = %id, "Failed to delete invoice");
            return Ok(ActionOutcome::rejected(
                RejectReason::Persistence,
                FormState::message(messages::DELETE_DB_ERROR),
            ));
        }
    }

    ctx.revalidator.revalidate_path(INVOICES_PATH);
    Ok(ActionOutcome::Completed)
}
