use std::path::PathBuf;

use clap::Args;
use eyre::{Context, Result};
use tsmirror_core::{EmissionItem, TypeDefinition};
use tsmirror_manifest::MANIFEST_FILE;

#[derive(Args)]
pub struct CheckCommand {
    /// Path to tsmirror.toml
    #[arg(short, long, default_value = MANIFEST_FILE)]
    pub config: PathBuf,
}

impl CheckCommand {
    pub fn run(&self) -> Result<()> {
        let (file, generator) = super::load(&self.config);
        let items = generator.items().wrap_err("Validation failed")?;

        println!("✓ {} is valid\n", file.path().display());
        println!("  namespace {}", generator.input().namespace());

        let count = |pred: fn(&EmissionItem) -> bool| items.iter().filter(|i| pred(i)).count();
        let types = count(|i| matches!(i, EmissionItem::Type(_)));
        let routes = count(|i| matches!(i, EmissionItem::Route(_)));
        let data = count(|i| matches!(i, EmissionItem::Data(_)));
        println!(
            "  {} type{}, {} route{}, {} constant{}:",
            types,
            plural(types),
            routes,
            plural(routes),
            data,
            plural(data)
        );

        for item in &items {
            match item {
                EmissionItem::Type(TypeDefinition::Alias { name, ty }) => {
                    println!("    type {} = {}", name, ty);
                }
                EmissionItem::Type(TypeDefinition::Object { name, fields }) => {
                    println!("    type {} ({} fields)", name, fields.len());
                }
                EmissionItem::Route(route) => {
                    println!(
                        "    {} {} {} -> {}",
                        route.name, route.method, route.path, route.response
                    );
                }
                EmissionItem::Data(data) => {
                    println!("    const {}: {}", data.name, data.ts_type);
                }
            }
        }
        Ok(())
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}
