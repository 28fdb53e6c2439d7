//! Output formatters for coupon lookup results

use anyhow::Result;
use colored::*;
use cupongas_core::{CouponRecord, CylinderCounts};

/// Print a record in human-readable format with colors
pub fn print_human(record: &CouponRecord) {
    println!("{} {}", "RUT:".bold(), record.rut.cyan().bold());

    let full_name = format!("{} {}", record.nombres, record.apellidos);
    if !full_name.trim().is_empty() {
        println!("{} {}", "Afiliado:".bold(), full_name.trim());
    }
    if !record.establecimiento.is_empty() {
        println!("{} {}", "Establecimiento:".bold(), record.establecimiento);
    }
    println!();

    print_vendor("Lipigas", &record.lipigas);
    print_vendor("Abastible", &record.abastible);

    if record.compras.total() > 0.0 {
        println!("{}", "Compras generales".bold().underline());
        for (label, qty) in [
            ("Cine", record.compras.cine),
            ("Energy", record.compras.energy),
            ("Jumper", record.compras.jumper),
        ] {
            if qty > 0.0 {
                println!("  {:<8} {}", label, format_qty(qty).green());
            }
        }
        println!();
    }

    println!("{}", "Resumen del mes".bold().underline());
    println!("  {:<12} {}", "Usados:", format_qty(record.usado_en_el_mes).yellow());
    let disponible = format_qty(record.disponible);
    if record.disponible > 0.0 {
        println!("  {:<12} {}", "Disponibles:", disponible.green().bold());
    } else {
        println!("  {:<12} {}", "Disponibles:", disponible.red().bold());
    }
}

fn print_vendor(name: &str, counts: &CylinderCounts) {
    println!("{}", name.bold().underline());
    for (label, qty) in [
        ("5 kg", counts.kg5),
        ("11 kg", counts.kg11),
        ("15 kg", counts.kg15),
        ("45 kg", counts.kg45),
    ] {
        let shown = format_qty(qty);
        if qty > 0.0 {
            println!("  {:<6} {}", label, shown.green());
        } else {
            println!("  {:<6} {}", label, shown);
        }
    }
    println!();
}

/// Print a record as JSON
pub fn print_json(record: &CouponRecord) -> Result<()> {
    let json = serde_json::to_string_pretty(record)?;
    println!("{json}");
    Ok(())
}

pub fn print_not_found(rut: &str) {
    println!(
        "{}",
        format!("RUT {rut} was not found in any sheet").red().bold()
    );
}

fn format_qty(qty: f64) -> String {
    if qty.fract() == 0.0 && qty.is_finite() {
        format!("{}", qty as i64)
    } else {
        qty.to_string()
    }
}
