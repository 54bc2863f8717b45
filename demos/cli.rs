use clap::Parser;
use rest_lookup::prelude::*;
use tracing_subscriber::EnvFilter;

/// Validate a filter and a sort against a demo "users" schema.
#[derive(Debug, Parser)]
struct Cli {
    /// Filter, e.g. `{"age": {"$gte": 18}}`
    #[arg(short, long)]
    filter: Vec<String>,

    /// Sort, e.g. `name,-created`
    #[arg(short, long)]
    sort: Option<String>,
}

fn schema() -> Schema {
    Schema::new()
        .field("name", Field::new().filterable().sortable().validator(Text))
        .field("age", Field::new().filterable().sortable().validator(Integer))
        .field("active", Field::new().filterable().validator(Bool))
        .field("created", Field::new().sortable().validator(Time))
        .field("friends", Field::new().filterable().validator(ReferenceArray::new("users")))
        .field(
            "address",
            Field::new().schema(
                Schema::new()
                    .field("city", Field::new().filterable().sortable())
                    .field("country", Field::new().filterable()),
            ),
        )
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let schema = schema();
    let mut lookup = Lookup::new();

    for filter in &cli.filter {
        println!("Filter: '{filter}'");
        if let Err(err) = lookup.add_filter(filter, &schema) {
            eprintln!("Invalid filter: {err}");
            std::process::exit(1);
        }
    }

    if let Some(sort) = &cli.sort {
        println!("Sort: '{sort}'");
        if let Err(err) = lookup.set_sort(sort, &schema) {
            eprintln!("Invalid sort: {err}");
            std::process::exit(1);
        }
    }

    println!("\nFilter:\n{}", lookup.filter());
    println!("\nExpressions:\n{:#?}", lookup.filter().expressions());
    println!(
        "\nSort:\n{}",
        lookup
            .sort()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    );
}
