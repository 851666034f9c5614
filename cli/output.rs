use byte_unit::{Byte, UnitType};
use colored::*;
use snipcode_core::Package;
use std::path::Path;

pub fn print_compile_report(package: &Package, output_path: &Path) {
    for file in &package.files {
        println!(
            "{} Included {} ({} chars)",
            "➡️".cyan(),
            file.path,
            file.size.to_string().dimmed()
        );
    }
    if package.tree_included {
        println!("{} Appended file tree", "🌳".green());
    }
    println!(
        "{} Wrote {}: {} files, {} total content chars ({})",
        "📥".green(),
        output_path.display().to_string().blue(),
        package.files.len(),
        package.total_chars,
        readable_size(package.content.len())
    );
}

pub fn readable_size(bytes: usize) -> String {
    Byte::from_u128(bytes as u128)
        .unwrap_or_default()
        .get_appropriate_unit(UnitType::Binary)
        .to_string()
}

pub fn print_section(title: &str) {
    println!(
        "{}",
        format!("\n--- {} ---", title).green().bold().underline()
    );
}

pub fn print_path_list(paths: &[String]) {
    if paths.is_empty() {
        println!("{}", "(None)".dimmed());
    } else {
        paths.iter().for_each(|p| println!("- {}", p.cyan()));
    }
}
