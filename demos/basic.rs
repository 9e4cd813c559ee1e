use criterust::*;
use std::sync::Arc;

fn main() -> Result<(), CriterustError> {
    // 1. Describe the record type once, at configuration time.
    let spec = Arc::new(
        FilterSpecBuilder::new("Employee")
            .column("name", ColumnKind::Varchar)
            .column("age", ColumnKind::Integer)
            .column("is_active", ColumnKind::TinyInt)
            .column("hired_at", ColumnKind::Date)
            .foreign_key("department_id", "Department", "id")
            .build(),
    );

    // 2. Register a conversion hook: trim the name before filtering.
    let mut hooks = ConvertRegistry::new();
    hooks.register(
        "name",
        |v: &FilterValue| -> Result<Conversion, CriterustError> {
            let text = v.scalar_text().unwrap_or_default();
            Ok(Conversion::Keep(FilterValue::text(text.trim())))
        },
    );

    let compiler = FilterCompiler::new(spec).with_hooks(hooks);

    // 3. Compile a submitted value map into a predicate tree.
    let mut values = FilterValues::new();
    values.insert("name".to_string(), FilterValue::text("  ada* "));
    values.insert("is_active".to_string(), FilterValue::Bool(true));
    values.insert(
        "hired_at".to_string(),
        FilterValue::range(Some("2020-01-01"), None),
    );
    values.insert("department_id".to_string(), FilterValue::reference("3"));

    let tree = compiler.compile(values)?;
    println!("Predicate tree: {:#?}", tree);

    Ok(())
}
