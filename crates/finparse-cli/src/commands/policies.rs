use finparse_core::error::FinparseError;
use finparse_core::model::StatementFormat;
use finparse_core::privacy::mask::mask_value;
use finparse_core::privacy::schema::FieldHandling;
use finparse_core::privacy::{self, builtin};
use std::path::Path;

pub fn list() -> Result<(), FinparseError> {
    println!("Built-in privacy policies:\n");
    for name in builtin::PRESETS {
        let policy = builtin::load_preset(name)?;
        println!("  {:<8} {}", name, policy.name);
        if let Some(ref desc) = policy.description {
            println!("           {}", desc);
        }
        println!();
    }
    Ok(())
}

pub fn explain(format: &str) -> Result<(), FinparseError> {
    let format: StatementFormat = format.parse()?;
    let policy = builtin::preset_for(format)?;

    println!("{} ({} statements)\n", policy.name, format);
    if let Some(ref desc) = policy.description {
        println!("{}\n", desc);
    }

    println!("  raw      every field exported as parsed");
    println!("  masked   fields below are dropped or masked");
    println!("  clean    every field below is removed\n");

    let sensitive = policy.sensitive_fields();
    let width = sensitive
        .iter()
        .map(|(f, _)| f.as_str().len())
        .max()
        .unwrap_or(10);

    println!("  {:<width$}  {:<6}  Weight", "Field", "Masked", width = width);
    println!("  {}", "-".repeat(width + 16));
    for (field, handling) in &sensitive {
        let weight = policy.fields.get(field.as_str()).copied().unwrap_or(1);
        println!(
            "  {:<width$}  {:<6}  {}",
            field.as_str(),
            handling.as_str(),
            weight,
            width = width
        );
    }

    println!("\nMasking examples:");
    println!("  jane@okaxis   -> {}", mask_value("jane@okaxis"));
    println!("  401234567890  -> {}", mask_value("401234567890"));
    println!();

    Ok(())
}

pub fn validate(file: &Path) -> Result<(), FinparseError> {
    let policy = privacy::load_policy(file)?;

    println!("Policy '{}' is valid.", policy.name);
    let sensitive = policy.sensitive_fields();
    let dropped: Vec<&str> = sensitive
        .iter()
        .filter(|(_, h)| *h == FieldHandling::Drop)
        .map(|(f, _)| f.as_str())
        .collect();
    let masked: Vec<&str> = sensitive
        .iter()
        .filter(|(_, h)| *h == FieldHandling::Mask)
        .map(|(f, _)| f.as_str())
        .collect();
    println!("  Dropped when masked: {}", display_list(&dropped));
    println!("  Masked: {}", display_list(&masked));

    // Warn about policies that name fields their format never produces
    if let Some(format) = policy
        .format
        .as_deref()
        .and_then(StatementFormat::from_str_loose)
    {
        let unused: Vec<&str> = sensitive
            .iter()
            .filter(|(f, _)| !format.native_columns().contains(f))
            .map(|(f, _)| f.as_str())
            .collect();
        if !unused.is_empty() {
            println!("\nWarnings:");
            for name in unused {
                println!("  - '{}' is not produced by {} statements", name, format);
            }
        }
    }

    Ok(())
}

fn display_list(names: &[&str]) -> String {
    if names.is_empty() {
        "-".into()
    } else {
        names.join(", ")
    }
}
