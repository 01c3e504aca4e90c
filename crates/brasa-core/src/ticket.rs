//! # Ticket / Report Formatter
//!
//! Structured data contracts for everything a rendering target needs to
//! print, plus a plain-text rendering for the thermal printer path. HTML
//! and PDF renderers consume the same structs and never reach back into
//! the cart or the database.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::normalize::fold;
use crate::report::{ChickenTotals, CutReport, ExtrasTotals, PaymentTotals, ProductRow};
use crate::sale::Sale;

/// Thermal printer line width, characters.
const TICKET_WIDTH: usize = 32;

fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    let pad = (width - len) / 2;
    format!("{}{}", " ".repeat(pad), text)
}

fn amount_line(label: &str, amount: Money, width: usize) -> String {
    let amount = amount.to_string();
    let pad = width.saturating_sub(label.chars().count() + amount.len());
    format!("{}{}{}", label, " ".repeat(pad.max(1)), amount)
}

fn payment_label(raw: &str) -> String {
    let folded = fold(raw);
    if folded.contains("efectivo") || folded.contains("cash") {
        "Efectivo".to_string()
    } else if folded.contains("tarjeta") || folded.contains("card") {
        "Tarjeta".to_string()
    } else {
        raw.to_string()
    }
}

// =============================================================================
// Sale Ticket
// =============================================================================

/// One printable line of a sale ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TicketLine {
    pub name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub subtotal_cents: i64,
    pub category: Option<String>,
    pub flavor: Option<String>,
}

/// Everything a renderer needs to print one sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleTicket {
    pub business_name: String,
    pub sale_id: String,
    pub date_label: String,
    pub lines: Vec<TicketLine>,
    pub total_cents: i64,
    /// Operator-facing payment label ("Efectivo", "Tarjeta", or the raw
    /// stored value when unrecognized).
    pub payment_label: String,
    pub cash_received_cents: Option<i64>,
    pub change_cents: Option<i64>,
    pub notes: Option<String>,
}

impl SaleTicket {
    /// Builds the ticket contract from a persisted sale.
    pub fn from_sale(business_name: &str, sale: &Sale) -> SaleTicket {
        SaleTicket {
            business_name: business_name.to_string(),
            sale_id: sale.id.clone(),
            date_label: sale.created_at.format("%d/%m/%Y %H:%M").to_string(),
            lines: sale
                .items
                .iter()
                .map(|item| TicketLine {
                    name: item.name.clone(),
                    quantity: item.quantity,
                    unit_price_cents: item.unit_price_cents,
                    subtotal_cents: item.subtotal_cents,
                    category: item.category.clone(),
                    flavor: item.flavor.clone(),
                })
                .collect(),
            total_cents: sale.total_cents,
            payment_label: payment_label(&sale.payment_method),
            cash_received_cents: sale.cash_received_cents,
            change_cents: sale.change_cents,
            notes: sale.notes.clone(),
        }
    }

    /// Plain-text rendering for the thermal printer.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let divider = "-".repeat(TICKET_WIDTH);

        out.push_str(&center(&self.business_name, TICKET_WIDTH));
        out.push('\n');
        out.push_str(&center(&self.date_label, TICKET_WIDTH));
        out.push('\n');
        out.push_str(&divider);
        out.push('\n');

        for line in &self.lines {
            out.push_str(&format!("{} x {}\n", line.quantity, line.name));
            out.push_str(&amount_line("", Money::from_cents(line.subtotal_cents), TICKET_WIDTH));
            out.push('\n');
        }

        out.push_str(&divider);
        out.push('\n');
        out.push_str(&amount_line("TOTAL", Money::from_cents(self.total_cents), TICKET_WIDTH));
        out.push('\n');
        out.push_str(&format!("Pago: {}\n", self.payment_label));

        if let Some(received) = self.cash_received_cents {
            out.push_str(&amount_line("Recibido", Money::from_cents(received), TICKET_WIDTH));
            out.push('\n');
        }
        if let Some(change) = self.change_cents {
            out.push_str(&amount_line("Cambio", Money::from_cents(change), TICKET_WIDTH));
            out.push('\n');
        }
        if let Some(notes) = &self.notes {
            out.push_str(&format!("Nota: {}\n", notes));
        }

        out.push_str(&format!("Venta {}\n", self.sale_id));
        out
    }
}

// =============================================================================
// Cut Ticket
// =============================================================================

/// Everything a renderer needs to print the corte for a range.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CutTicket {
    pub business_name: String,
    pub range_label: String,
    pub sale_count: u32,
    pub chicken: ChickenTotals,
    pub products: Vec<ProductRow>,
    pub extras: ExtrasTotals,
    pub payments: PaymentTotals,
    pub grand_total_cents: i64,
}

impl CutTicket {
    /// Builds the corte ticket contract from an aggregation result.
    pub fn from_report(business_name: &str, report: &CutReport) -> CutTicket {
        CutTicket {
            business_name: business_name.to_string(),
            range_label: report.range.label(),
            sale_count: report.sale_count,
            chicken: report.chicken,
            products: report.products.clone(),
            extras: report.extras,
            payments: report.payments.clone(),
            grand_total_cents: report.grand_total_cents,
        }
    }

    /// Plain-text rendering, production-oriented: chicken counts first,
    /// then the grouped rows, then money.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let divider = "-".repeat(TICKET_WIDTH);

        out.push_str(&center(&self.business_name, TICKET_WIDTH));
        out.push('\n');
        out.push_str(&center("CORTE", TICKET_WIDTH));
        out.push('\n');
        out.push_str(&center(&self.range_label, TICKET_WIDTH));
        out.push('\n');
        out.push_str(&format!("Ventas: {}\n", self.sale_count));
        out.push_str(&divider);
        out.push('\n');

        out.push_str(&format!("Pollos enteros: {}\n", self.chicken.whole));
        out.push_str(&format!("Medios: {}\n", self.chicken.half));
        out.push_str(&format!("Cuartos: {}\n", self.chicken.quarter));
        out.push_str(&format!("Equivalente: {:.2}\n", self.chicken.equivalent()));
        out.push_str(&divider);
        out.push('\n');

        for row in &self.products {
            out.push_str(&format!("{} x {}\n", row.quantity, row.name));
            out.push_str(&amount_line("", Money::from_cents(row.subtotal_cents), TICKET_WIDTH));
            out.push('\n');
        }

        out.push_str(&divider);
        out.push('\n');
        out.push_str(&format!("Extras: {}\n", self.extras.paid_quantity));
        out.push_str(&format!("Incluidos: {}\n", self.extras.included_quantity));
        out.push_str(&format!("Desechables: {}\n", self.extras.disposables_quantity));
        out.push_str(&divider);
        out.push('\n');

        out.push_str(&amount_line(
            &format!("Efectivo ({})", self.payments.cash.count),
            Money::from_cents(self.payments.cash.total_cents),
            TICKET_WIDTH,
        ));
        out.push('\n');
        out.push_str(&amount_line(
            &format!("Tarjeta ({})", self.payments.card.count),
            Money::from_cents(self.payments.card.total_cents),
            TICKET_WIDTH,
        ));
        out.push('\n');
        if self.payments.other.count > 0 {
            out.push_str(&amount_line(
                &format!("Otros ({})", self.payments.other.count),
                Money::from_cents(self.payments.other.total_cents),
                TICKET_WIDTH,
            ));
            out.push('\n');
        }
        out.push_str(&amount_line("TOTAL", Money::from_cents(self.grand_total_cents), TICKET_WIDTH));
        out.push('\n');
        out
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
