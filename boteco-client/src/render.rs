//! Plain-text tables for the `boteco` CLI, one layout per collection

use shared::{Dish, Order, StaffMember, StockItem, Table};

/// Align `rows` under `headers`, columns separated by two spaces
fn render(headers: &[&str], rows: Vec<Vec<String>>) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let header: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

    let mut out = vec![line(&header), line(&rule)];
    out.extend(rows.iter().map(|row| line(row)));
    out.join("\n")
}

pub fn tables(tables: &[Table]) -> String {
    render(
        &["#", "Capacity"],
        tables
            .iter()
            .map(|t| vec![t.number.to_string(), t.capacity.to_string()])
            .collect(),
    )
}

pub fn orders(orders: &[Order]) -> String {
    render(
        &["ID", "Table", "Staff", "Date", "Status"],
        orders
            .iter()
            .map(|o| {
                vec![
                    o.id.to_string(),
                    o.table_id.to_string(),
                    o.staff_id.to_string(),
                    o.placed_at.clone(),
                    o.status.clone(),
                ]
            })
            .collect(),
    )
}

pub fn dishes(dishes: &[Dish]) -> String {
    render(
        &["Dish", "Sales"],
        dishes
            .iter()
            .map(|d| vec![d.name.clone(), d.total_sales.to_string()])
            .collect(),
    )
}

pub fn stock(items: &[StockItem]) -> String {
    render(
        &["Product", "Current", "Minimum", ""],
        items
            .iter()
            .map(|i| {
                vec![
                    i.product_name.clone(),
                    i.current_stock.to_string(),
                    i.minimum_stock.to_string(),
                    if i.is_below_minimum() { "LOW".to_string() } else { String::new() },
                ]
            })
            .collect(),
    )
}

pub fn staff(members: &[StaffMember]) -> String {
    render(
        &["Name", "Normal hours", "Overtime"],
        members
            .iter()
            .map(|m| {
                vec![
                    m.name.clone(),
                    m.normal_hours.to_string(),
                    m.overtime_hours.to_string(),
                ]
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_layout() {
        let out = tables(&[
            Table {
                id: 1,
                number: 3,
                capacity: 4,
            },
            Table {
                id: 2,
                number: 12,
                capacity: 10,
            },
        ]);
        assert_eq!(out, "#   Capacity\n--  --------\n3   4\n12  10");
    }

    #[test]
    fn test_stock_marks_low_items() {
        let out = stock(&[StockItem {
            id: 1,
            product_name: "Limão".to_string(),
            current_stock: 1.0,
            minimum_stock: 2.0,
        }]);
        assert!(out.lines().last().unwrap().ends_with("LOW"));
    }
}
