//! Terminal Output

use serde::Serialize;

use shop_core::{CartSummary, PaymentTransaction, Product, UiStatus, User};

/// Renders command results as tables or JSON
pub struct Output {
    json: bool,
}

impl Output {
    pub const fn new(json: bool) -> Self {
        Self { json }
    }

    /// Print `value` as JSON when in JSON mode, otherwise run `table`
    pub fn emit<T: Serialize + ?Sized>(&self, value: &T, table: impl FnOnce(&T)) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            table(value);
        }
        Ok(())
    }

    pub fn note(&self, message: &str) {
        if self.json {
            println!("{}", serde_json::json!({ "message": message }));
        } else {
            println!("{message}");
        }
    }

    pub fn status(&self, status: &UiStatus) {
        if self.json {
            println!("{}", serde_json::to_string(status).unwrap_or_default());
        } else {
            println!("{status}");
        }
    }
}

pub fn products(products: &[Product]) {
    if products.is_empty() {
        println!("No products found.");
        return;
    }
    println!("{:<38} {:<32} {:>10}  {}", "ID", "NAME", "PRICE", "CATEGORY");
    for p in products {
        println!(
            "{:<38} {:<32} {:>10}  {}",
            p.id,
            truncate(&p.name, 32),
            format!("${:.2}", p.price),
            p.category
        );
    }
}

pub fn product(p: &Product) {
    println!("{}", p.name);
    println!("  id:       {}", p.id);
    println!("  price:    ${:.2}", p.price);
    println!("  category: {}", p.category);
    println!("  stock:    {}", if p.in_stock() { p.stock.to_string() } else { "sold out".into() });
    println!("  image:    {}", p.image_url);
    println!();
    println!("{}", p.description);
}

pub fn cart(summary: &CartSummary) {
    if summary.is_empty() {
        println!("Your cart is empty.");
        return;
    }
    println!("{:<32} {:>5} {:>10} {:>10}", "ITEM", "QTY", "PRICE", "TOTAL");
    for line in &summary.lines {
        println!(
            "{:<32} {:>5} {:>10} {:>10}",
            truncate(&line.product.name, 32),
            line.quantity,
            format!("${:.2}", line.product.price),
            format!("${:.2}", line.line_total())
        );
    }
    println!(
        "{} item(s), subtotal ${:.2}",
        summary.item_count(),
        summary.subtotal()
    );
}

pub fn user(user: &User) {
    println!("{} <{}>", user.name, user.email);
    println!("  id: {}", user.id);
}

pub fn transactions(transactions: &[PaymentTransaction]) {
    if transactions.is_empty() {
        println!("No payments yet.");
        return;
    }
    for tx in transactions {
        let when = tx
            .created_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!(
            "{when:<16} {:>10} {:<4} {:<10} {}",
            format!("${:.2}", tx.amount),
            tx.currency,
            tx.payment_status,
            tx.session_id
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Shoes", 32), "Shoes");
        assert_eq!(truncate("Premium wireless headphones", 10), "Premium...");
    }
}
