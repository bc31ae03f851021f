use sibyl_core::{IsolationLevel, QueryGenerator, QueryOptions, Transaction};

fn main() -> sibyl_core::Result<()> {
    let generator = QueryGenerator::default();

    let outer = Transaction::new("transfer");
    let savepoint = Transaction::new("debit");
    let top_level = QueryOptions::new();
    let nested = QueryOptions::new().parent(outer.name.clone());

    println!("{}", generator.set_autocommit_query());
    println!("{}", generator.start_transaction_query(&outer, &top_level)?);
    println!(
        "{}",
        generator.isolation_level_query(IsolationLevel::ReadCommitted)
    );

    println!("{}", generator.start_transaction_query(&savepoint, &nested)?);
    println!("{}", generator.rollback_transaction_query(&savepoint, &nested)?);
    println!("{}", generator.commit_transaction_query(&top_level));

    // Levels can also come from configuration text
    for level in ["READ_UNCOMMITTED", "serializable", "SNAPSHOT"] {
        match generator.set_isolation_level_query(level) {
            Ok(sql) => println!("{}: {}", level, sql),
            Err(err) => println!("{}: {}", level, err),
        }
    }

    Ok(())
}
