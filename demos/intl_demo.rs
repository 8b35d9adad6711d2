//! Demonstration of the intl-map message-catalog library
//!
//! Run with: `cargo run --example intl_demo`

use std::sync::Arc;

use intl_map::{
    parse_catalog, Additions, Catalog, CatalogDefinition, Message, MessageSet, Preferences,
    TranslationView, Value,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    println!("=== intl-map Demo ===\n");

    let catalog = Arc::new(build_catalog());

    println!("--- Available languages ---");
    for code in catalog.availables() {
        let name = catalog.messages_for(code).display_name().unwrap_or("?");
        println!("{code}: {name}");
    }

    println!("\n=== Preference Resolution ===");
    demonstrate_resolution(&catalog);

    println!("\n=== Translation Views ===");
    demonstrate_views(&catalog);

    println!("\n=== Merging ===");
    demonstrate_merge(&catalog);

    println!("\n=== Serialization ===");
    demonstrate_serialization(&catalog);
}

fn build_catalog() -> Catalog {
    Catalog::from_definition(
        CatalogDefinition::new(
            MessageSet::new("English")
                .with("welcome", "Welcome!")
                .with("hello", Message::template("Hello {0}")),
        )
        .with_alias("en")
        .with_language(
            "fr",
            MessageSet::new("Français")
                .with("welcome", "Bienvenue !")
                .with("hello", Message::template("Bonjour {0}")),
        )
        .with_language(
            "fr_ca",
            MessageSet::new("Français (Canada)").with("hello", Message::template("Allo {0}")),
        )
        .with_language(
            "eo",
            MessageSet::new("Esperanto")
                .with("welcome", "Bonvenon!")
                .with("hello", Message::template("Saluton {0}")),
        ),
    )
    .expect("demo catalog definition is valid")
}

fn demonstrate_resolution(catalog: &Catalog) {
    for raw in [
        vec!["fr-CA"],
        vec!["eo", "dummy", "fr"],
        vec!["zh-Hans-CN", "en-US"],
    ] {
        let prefs = Preferences::resolve(catalog, &raw, true);
        println!("{raw:?} -> {:?}", prefs.codes());
    }
}

fn demonstrate_views(catalog: &Arc<Catalog>) {
    let view = TranslationView::new(Arc::clone(catalog), &["fr-CA"], true)
        .expect("demo keys are not reserved");
    print_messages("fr-CA (generic expansion)", &view);

    // Immutable change: the original view stays on French.
    let esperanto = view.with_preferences(&["eo"], true);
    print_messages("eo (immutable sibling)", &esperanto);

    // Mutable change with an observer.
    let mut mutable = TranslationView::new(Arc::clone(catalog), &[] as &[&str], true)
        .expect("demo keys are not reserved");
    mutable.on_change(|prefs| println!("  [observer] preferences now {:?}", prefs.codes()));
    mutable.change_preferences(&["fr"], true);
    print_messages("fr (after in-place change)", &mutable);
}

fn print_messages(label: &str, view: &TranslationView) {
    println!("--- {label} ---");
    for key in ["welcome", "hello"] {
        match view.translate(key, &[Value::from("Alice")]) {
            Ok(text) => println!("{key}: {text}"),
            Err(err) => println!("{key}: <{err}>"),
        }
    }
}

fn demonstrate_merge(catalog: &Catalog) {
    let merged = catalog
        .merge(
            Additions::new()
                .language(
                    "it",
                    MessageSet::new("Italiano").with("welcome", "Benvenuto!"),
                )
                .language("fr", MessageSet::partial().with("farewell", "Au revoir")),
        )
        .expect("demo merge input is valid");

    println!("languages after merge: {:?}", merged.availables());
    let view = TranslationView::new(Arc::new(merged), &["fr"], true)
        .expect("demo keys are not reserved");
    println!("farewell (fr): {}", view.t("farewell").expect("merged key"));
}

fn demonstrate_serialization(catalog: &Catalog) {
    let subset = catalog.serialize_subset(&["fr"]);
    println!("subset (fr only, others stubbed):\n{subset}");

    let copy = parse_catalog(&catalog.serialize()).expect("serialized text parses");
    println!(
        "round-trip preserved {} languages, default '{}'",
        copy.availables().len(),
        copy.default_code().unwrap_or("-")
    );
}
