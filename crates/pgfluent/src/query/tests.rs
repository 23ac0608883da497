use super::*;
use crate::expr::{count_star, max, now, Comparable};
use crate::schema::{Field, Table};

fn users() -> Table {
    Table::new("users")
}

fn orders() -> Table {
    Table::new("orders")
}

fn user_id() -> Field<i64> {
    Field::new("users", 1, "id", "bigint")
}

fn user_name() -> Field<String> {
    Field::new("users", 2, "name", "text")
}

fn user_age() -> Field<i32> {
    Field::new("users", 3, "age", "integer")
}

fn order_id() -> Field<i64> {
    Field::new("orders", 1, "id", "bigint")
}

fn order_user_id() -> Field<i64> {
    Field::new("orders", 2, "user_id", "bigint")
}

fn order_total() -> Field<i64> {
    Field::new("orders", 3, "total", "bigint")
}

#[test]
fn select_renders_projection_and_source() {
    let query = select(vec![&user_id(), &user_name()]).from(&users());
    assert_eq!(query.to_sql(), "SELECT users.id, users.name FROM users");
}

#[test]
fn select_all_renders_star() {
    assert_eq!(select_all().from(&users()).to_sql(), "SELECT * FROM users");
}

#[test]
fn aliased_items_render_quoted() {
    let display = user_name().as_("Display");
    let total = count_star().as_("total");
    let query = select(vec![&display, &total]).from(&users());
    assert_eq!(
        query.to_sql(),
        "SELECT users.name AS \"Display\", COUNT(*) AS \"total\" FROM users"
    );
}

#[test]
fn where_numbers_params_in_order() {
    let query = select(vec![&user_id()])
        .from(&users())
        .where_(user_name().eq("ada".to_string()).and(user_age().gt(30)));
    let (sql, params) = query.render();
    assert_eq!(
        sql,
        "SELECT users.id FROM users WHERE (users.name = $1 AND users.age > $2)"
    );
    assert_eq!(params.debug_values(), vec!["\"ada\"", "30"]);
}

#[test]
fn rendering_is_repeatable() {
    let query = select(vec![&user_id()])
        .from(&users())
        .where_(user_age().gte(18));
    let (first, first_params) = query.render();
    let (second, second_params) = query.render();
    assert_eq!(first, second);
    assert_eq!(first_params.len(), second_params.len());
}

#[test]
fn join_requires_and_renders_on() {
    let query = select(vec![&user_name(), &order_total()])
        .from(&users())
        .join(&orders())
        .on(order_user_id().eq_expr(&user_id()))
        .where_(order_total().gt(100));
    let (sql, params) = query.render();
    assert_eq!(
        sql,
        "SELECT users.name, orders.total FROM users \
         JOIN orders ON orders.user_id = users.id \
         WHERE orders.total > $1"
    );
    assert_eq!(params.len(), 1);
}

#[test]
fn left_outer_join_renders_in_full() {
    let query = select_all()
        .from(&users())
        .left_outer_join(&orders())
        .on(order_user_id().eq_expr(&user_id()));
    assert_eq!(
        query.to_sql(),
        "SELECT * FROM users LEFT OUTER JOIN orders ON orders.user_id = users.id"
    );
}

#[test]
fn chained_joins_accumulate() {
    let items = Table::new("items");
    let item_order: Field<i64> = Field::new("items", 1, "order_id", "bigint");
    let query = select_all()
        .from(&users())
        .join(&orders())
        .on(order_user_id().eq_expr(&user_id()))
        .join(&items)
        .on(item_order.eq_expr(&order_id()));
    assert_eq!(
        query.to_sql(),
        "SELECT * FROM users \
         JOIN orders ON orders.user_id = users.id \
         JOIN items ON items.order_id = orders.id"
    );
}

#[test]
fn group_by_and_having_render_after_where() {
    let total = count_star().as_("n");
    let query = select(vec![&user_name(), &total])
        .from(&users())
        .join(&orders())
        .on(order_user_id().eq_expr(&user_id()))
        .where_(order_total().gt(0))
        .group_by(vec![&user_name()])
        .having(count_star().gt(5));
    let (sql, params) = query.render();
    assert_eq!(
        sql,
        "SELECT users.name, COUNT(*) AS \"n\" FROM users \
         JOIN orders ON orders.user_id = users.id \
         WHERE orders.total > $1 GROUP BY users.name HAVING COUNT(*) > $2"
    );
    assert_eq!(params.debug_values(), vec!["0", "5"]);
}

#[test]
fn order_by_renders_direction_per_key() {
    let query = select(vec![&user_name()])
        .from(&users())
        .order_by(vec![user_age().desc().into(), user_name().asc().into()]);
    assert_eq!(
        query.to_sql(),
        "SELECT users.name FROM users ORDER BY users.age DESC, users.name ASC"
    );
}

#[test]
fn order_by_expression_uses_its_alias() {
    let highest = max(&order_total()).as_("highest");
    let query = select(vec![&order_user_id(), &highest])
        .from(&orders())
        .group_by(vec![&order_user_id()])
        .order_by(vec![highest.desc()]);
    assert_eq!(
        query.to_sql(),
        "SELECT orders.user_id, MAX(orders.total) AS \"highest\" FROM orders \
         GROUP BY orders.user_id ORDER BY highest DESC"
    );
}

#[test]
fn limit_and_offset_share_one_clause() {
    let query = select_all().from(&users()).limit(10).offset(20);
    assert_eq!(query.to_sql(), "SELECT * FROM users LIMIT 10 OFFSET 20");
}

#[test]
fn repeated_limit_offset_overwrite_in_place() {
    let query = select_all()
        .from(&users())
        .limit(10)
        .offset(20)
        .limit(5)
        .offset(0);
    assert_eq!(query.to_sql(), "SELECT * FROM users LIMIT 5 OFFSET 0");
}

#[test]
fn limit_zero_still_renders() {
    assert_eq!(
        select_all().from(&users()).limit(0).to_sql(),
        "SELECT * FROM users LIMIT 0"
    );
}

#[test]
fn offset_alone_renders_without_limit() {
    assert_eq!(
        select_all().from(&users()).offset(30).to_sql(),
        "SELECT * FROM users OFFSET 30"
    );
}

#[test]
fn subquery_continues_outer_numbering() {
    let inner = select(vec![&order_user_id()])
        .from(&orders())
        .where_(order_total().gt(100));
    let query = select(vec![&user_name()])
        .from(&users())
        .where_(user_age().gte(18).and(user_id().in_query(inner)));
    let (sql, params) = query.render();
    assert_eq!(
        sql,
        "SELECT users.name FROM users WHERE (users.age >= $1 AND users.id IN \
         (SELECT orders.user_id FROM orders WHERE orders.total > $2))"
    );
    assert_eq!(params.debug_values(), vec!["18", "100"]);
}

#[test]
fn scalar_subquery_comparison_parenthesizes() {
    let highest = select(vec![&max(&order_total())]).from(&orders());
    let query = select(vec![&order_id()])
        .from(&orders())
        .where_(order_total().eq_query(highest));
    assert_eq!(
        query.to_sql(),
        "SELECT orders.id FROM orders WHERE orders.total = \
         (SELECT MAX(orders.total) FROM orders)"
    );
}

#[test]
fn update_assignments_keep_call_order() {
    let statement = update(&users())
        .set(&user_name(), "grace".to_string())
        .set(&user_age(), 41)
        .where_(user_id().eq(7));
    let (sql, params) = statement.render();
    assert_eq!(sql, "UPDATE users SET name=$1, age=$2 WHERE users.id = $3");
    assert_eq!(params.debug_values(), vec!["\"grace\"", "41", "7"]);
}

#[test]
fn set_assignments_render_compact_while_conditions_keep_spaces() {
    // Assignments are `col=$n` with no spaces; comparisons keep `col op $n`.
    let statement = update(&users())
        .set(&user_age(), 30)
        .where_(user_age().lt(30));
    let (sql, _) = statement.render();
    assert_eq!(sql, "UPDATE users SET age=$1 WHERE users.age < $2");
}

#[test]
fn set_expr_renders_inline_without_binding() {
    let updated_at: Field<chrono::NaiveDateTime> =
        Field::new("users", 4, "updated_at", "timestamp");
    let statement = update(&users())
        .set(&user_name(), "grace".to_string())
        .set_expr(&updated_at, &now())
        .set_expr(&user_age(), &user_age().plus(1))
        .where_(user_id().eq(7));
    let (sql, params) = statement.render();
    assert_eq!(
        sql,
        "UPDATE users SET name=$1, updated_at=NOW(), age=users.age + 1 \
         WHERE users.id = $2"
    );
    assert_eq!(params.len(), 2);
}

#[test]
fn update_without_filter_is_complete() {
    let statement = update(&users()).set(&user_age(), 0);
    assert_eq!(statement.to_sql(), "UPDATE users SET age=$1");
}

#[test]
fn delete_renders_with_and_without_filter() {
    assert_eq!(delete_from(&users()).to_sql(), "DELETE FROM users");
    let filtered = delete_from(&users()).where_(user_id().eq(9));
    let (sql, params) = filtered.render();
    assert_eq!(sql, "DELETE FROM users WHERE users.id = $1");
    assert_eq!(params.debug_values(), vec!["9"]);
}

#[test]
fn insert_renders_bare_columns_and_placeholders() {
    let statement = insert_into(&users(), (&user_name(), &user_age()))
        .values(("ada".to_string(), 36));
    let (sql, params) = statement.render();
    assert_eq!(sql, "INSERT INTO users (name, age) VALUES ($1, $2)");
    assert_eq!(params.debug_values(), vec!["\"ada\"", "36"]);
}

#[test]
fn insert_returning_appends_bare_column() {
    let statement = insert_into(&users(), (&user_name(),))
        .values(("ada".to_string(),))
        .returning(&user_id());
    assert_eq!(
        statement.to_sql(),
        "INSERT INTO users (name) VALUES ($1) RETURNING id"
    );
}

#[test]
fn runnable_carries_rendered_text_and_params() {
    let unit = delete_from(&users()).where_(user_id().eq(3)).runnable();
    assert_eq!(unit.sql(), "DELETE FROM users WHERE users.id = $1");
    assert_eq!(unit.params().len(), 1);
}

#[test]
fn single_row_requires_exactly_one() {
    assert_eq!(single_row(Vec::<i32>::new()), None);
    assert_eq!(single_row(vec![5]), Some(5));
    assert_eq!(single_row(vec![5, 6]), None);
}

#[test]
fn cursor_stage_usable_as_subquery() {
    let inner = select(vec![&order_user_id()]).from(&orders()).limit(1);
    let query = select(vec![&user_name()])
        .from(&users())
        .where_(user_id().in_query(inner));
    assert_eq!(
        query.to_sql(),
        "SELECT users.name FROM users WHERE users.id IN \
         (SELECT orders.user_id FROM orders LIMIT 1)"
    );
}
