use sibyl_core::ddl::IndexTarget;
use sibyl_core::{
    AttributeDefinition, Attributes, QueryGenerator, QueryOptions, References, ReferentialAction,
    RowValues, TableReference, WhereClause,
};

fn main() -> sibyl_core::Result<()> {
    let generator = QueryGenerator::default();
    let users = TableReference::new("users").with_schema("app");

    // Schema and table
    println!("CREATE SCHEMA: {}", generator.create_schema("app")?);

    let mut attributes = Attributes::new();
    attributes.insert(
        "id".to_string(),
        AttributeDefinition::new("NUMBER(10)").not_null().primary_key(),
    );
    attributes.insert(
        "role".to_string(),
        AttributeDefinition::enumeration(["admin", "member"]).not_null(),
    );
    attributes.insert(
        "active".to_string(),
        AttributeDefinition::new("NUMBER(1)").default_value(true),
    );
    attributes.insert(
        "teamId".to_string(),
        AttributeDefinition::new("NUMBER(10)")
            .references(References::to("teams").on_delete(ReferentialAction::CASCADE)),
    );
    println!("CREATE TABLE: {}", generator.create_table_query(&users, &attributes)?);

    // INSERT
    let mut values = RowValues::new();
    values.insert("id".to_string(), 1.into());
    values.insert("role".to_string(), "admin".into());
    values.insert("active".to_string(), true.into());
    println!(
        "INSERT SQL: {}",
        generator.insert_query(&users, &values, &QueryOptions::new(), Some(&attributes))?
    );

    // UPDATE, skipping nulls except on foreign keys
    let mut updates = RowValues::new();
    updates.insert("role".to_string(), "member".into());
    updates.insert("nickname".to_string(), None::<String>.into());
    updates.insert("teamId".to_string(), None::<i32>.into());
    let where_clause = WhereClause::compiled("\"id\" = 1");
    println!(
        "UPDATE SQL: {}",
        generator.update_query(
            &users,
            &updates,
            &where_clause,
            &QueryOptions::new().omit_null(true),
            Some(&attributes),
        )?
    );

    // Both upsert flavors
    println!(
        "UPSERT SQL: {}",
        generator.upsert_query(&users, &values, &updates, &where_clause, &QueryOptions::new(), None)?
    );
    println!(
        "MERGE SQL: {}",
        generator.merge_upsert_query(&users, &values, &updates, &where_clause, &QueryOptions::new(), None)?
    );

    // DELETE and cleanup
    println!("DELETE SQL: {}", generator.delete_query(&users, &where_clause)?);
    println!(
        "DROP INDEX: {}",
        generator.remove_index_query(&users, IndexTarget::Attributes(vec!["role".into()]))?
    );
    println!("DROP TABLE: {}", generator.drop_table_query(&users)?);

    Ok(())
}
