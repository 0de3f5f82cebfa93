use serde_json::json;
use sql_page_rewriter::{
   Dialect, Error, NO_LIMIT, NO_OFFSET, Order, PageBounds, ParamType, ParameterMap,
   ParameterObject, ParameterPlaceholder, PlaceholderStyle, RewriteResult, Rewriter,
   RewriterConfig, StatementTemplate, normalize,
};

fn rewrite(
   dialect: Dialect,
   statement: &StatementTemplate,
   parameter: &ParameterObject,
   bounds: &PageBounds,
) -> RewriteResult {
   Rewriter::new(RewriterConfig::new().with_dialect(dialect))
      .rewrite(statement, parameter, bounds)
      .unwrap()
}

fn placeholder_names(result: &RewriteResult) -> Vec<&str> {
   result
      .placeholders()
      .iter()
      .map(|p| p.name.as_str())
      .collect()
}

// ─── Unpaged statements ───

#[test]
fn unpaged_request_yields_normalized_page_and_count() {
   let statements = [
      "SELECT * FROM t",
      "  SELECT * FROM t WHERE a = ?;  ",
      "SELECT * FROM (SELECT id FROM t ORDER BY id) x;",
   ];

   for sql in statements {
      let statement = StatementTemplate::with_names(sql, Vec::<String>::new());
      let bounds = PageBounds {
         offset: NO_OFFSET,
         limit: NO_LIMIT,
         orders: vec![],
      };

      let result = rewrite(Dialect::None, &statement, &ParameterObject::Null, &bounds);

      assert_eq!(result.page_sql(), normalize(sql));
      assert_eq!(
         result.count_sql(),
         format!("select count(1) from ({}) tmp_count", normalize(sql))
      );
   }
}

#[test]
fn normalize_examples() {
   assert_eq!(normalize("SELECT 1;"), "SELECT 1");
   assert_eq!(normalize("SELECT 1;;"), "SELECT 1;");
   assert_eq!(normalize(normalize("SELECT 1;")), normalize("SELECT 1;"));
}

// ─── Ordering ───

#[test]
fn single_order_wraps_statement() {
   let statement = StatementTemplate::with_names("SELECT * FROM t", Vec::<String>::new());
   let bounds = PageBounds::new().with_order(Order::desc("age"));

   let result = rewrite(Dialect::None, &statement, &ParameterObject::Null, &bounds);

   assert_eq!(
      result.page_sql(),
      "select * from (SELECT * FROM t) temp_order order by age DESC"
   );
}

#[test]
fn multiple_orders_have_no_trailing_separator() {
   let statement = StatementTemplate::with_names("SELECT * FROM t", Vec::<String>::new());
   let bounds = PageBounds::new()
      .with_order(Order::desc("age"))
      .with_order(Order::asc("name"));

   let result = rewrite(Dialect::None, &statement, &ParameterObject::Null, &bounds);

   assert!(result.page_sql().ends_with("order by age DESC, name ASC"));
}

#[test]
fn null_orders_are_skipped() {
   let statement = StatementTemplate::with_names("SELECT * FROM t", Vec::<String>::new());
   let bounds = PageBounds {
      orders: vec![None, Some(Order::asc("id")), None],
      ..PageBounds::default()
   };

   let result = rewrite(Dialect::None, &statement, &ParameterObject::Null, &bounds);

   assert_eq!(
      result.page_sql(),
      "select * from (SELECT * FROM t) temp_order order by id ASC"
   );
}

// ─── Count statement ───

#[test]
fn count_never_contains_order_or_limit() {
   let statement = StatementTemplate::with_names("SELECT * FROM t WHERE a = ?;", ["a"]);
   let bounds = PageBounds::page(4, 25)
      .with_order(Order::desc("created"))
      .with_order(Order::asc("id"));

   for dialect in [
      Dialect::MySql,
      Dialect::PostgreSql,
      Dialect::Oracle,
      Dialect::SqlServer,
      Dialect::Db2,
   ] {
      let result = rewrite(dialect, &statement, &json!(1).into(), &bounds);

      assert_eq!(
         result.count_sql(),
         "select count(1) from (SELECT * FROM t WHERE a = ?) tmp_count"
      );
      assert!(!result.count_sql().contains("order by"));
      assert!(!result.count_sql().contains("limit"));
      assert!(!result.count_sql().contains("rownum"));
      assert!(!result.count_sql().contains("fetch"));
      assert_eq!(result.count_values(), vec![json!(1)]);
   }
}

// ─── Parameters ───

#[test]
fn nested_placeholder_binds_full_name() {
   let statement = StatementTemplate::with_names("SELECT * FROM t WHERE uid = ?", ["user.id"]);

   let result = rewrite(
      Dialect::None,
      &statement,
      &json!({"user": {"id": 7}}).into(),
      &PageBounds::new(),
   );

   assert_eq!(result.parameters()["user.id"], json!(7));
   assert_eq!(result.parameters()["user"], json!({"id": 7}));
}

#[test]
fn scalar_binds_every_placeholder() {
   let statement = StatementTemplate::with_names(
      "SELECT * FROM t WHERE id = ? OR age > ?",
      ["id", "minAge"],
   );

   let result = rewrite(Dialect::None, &statement, &json!(30).into(), &PageBounds::new());

   assert_eq!(result.parameters()["id"], json!(30));
   assert_eq!(result.parameters()["minAge"], json!(30));
}

#[test]
fn map_parameter_is_not_mutated() {
   let mut map = ParameterMap::new();
   map.insert("status".into(), json!("open"));
   let parameter = ParameterObject::Map(map.clone());
   let statement =
      StatementTemplate::with_names("SELECT * FROM t WHERE status = ?", ["status"]);

   let result = rewrite(Dialect::MySql, &statement, &parameter, &PageBounds::page(2, 10));

   assert_eq!(result.parameters().len(), 3);
   assert!(matches!(parameter, ParameterObject::Map(ref m) if *m == map));
}

#[test]
fn synthetic_placeholders_follow_declared_ones() {
   let statement = StatementTemplate::new(
      "SELECT * FROM t WHERE status = ? AND owner = ?",
      vec![
         ParameterPlaceholder::new("status", ParamType::Text),
         ParameterPlaceholder::new("owner", ParamType::Integer),
      ],
   );
   let parameter = ParameterObject::from(json!({"status": "open", "owner": 9}));

   let result = rewrite(Dialect::MySql, &statement, &parameter, &PageBounds::page(3, 10));

   assert_eq!(
      result.page_sql(),
      "SELECT * FROM t WHERE status = ? AND owner = ? limit ?, ?"
   );
   assert_eq!(placeholder_names(&result), vec!["status", "owner", "__offset", "__limit"]);
   assert_eq!(result.placeholders()[2].param_type, ParamType::Integer);
   assert_eq!(
      result.ordered_values(),
      vec![json!("open"), json!(9), json!(20), json!(10)]
   );
}

#[test]
fn numbered_placeholders_continue_declared_sequence() {
   let config = RewriterConfig::new()
      .with_dialect(Dialect::PostgreSql)
      .with_placeholder_style(PlaceholderStyle::Numbered)
      .with_parameter_names("page_offset", "page_limit");
   let statement = StatementTemplate::with_names("SELECT * FROM t WHERE a = $1", ["a"]);

   let result = Rewriter::new(config)
      .rewrite(&statement, &json!(5).into(), &PageBounds::page(2, 20))
      .unwrap();

   assert_eq!(result.page_sql(), "SELECT * FROM t WHERE a = $1 limit $2 offset $3");
   assert_eq!(placeholder_names(&result), vec!["a", "page_limit", "page_offset"]);
   assert_eq!(result.parameters()["page_offset"], json!(20));
}

// ─── Errors ───

#[test]
fn paged_request_needs_a_dialect() {
   let statement = StatementTemplate::with_names("SELECT * FROM t", Vec::<String>::new());
   let rewriter = Rewriter::new(RewriterConfig::default());

   let err = rewriter
      .rewrite(&statement, &ParameterObject::Null, &PageBounds::new().with_offset(10))
      .unwrap_err();

   assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
   assert!(err.to_string().contains("no dialect selected"));
}

#[test]
fn unresolvable_property_fails() {
   let statement = StatementTemplate::with_names("SELECT * FROM t WHERE a = ?", ["filter.a"]);
   let rewriter = Rewriter::new(RewriterConfig::new().with_dialect(Dialect::H2));

   let result = rewriter.rewrite(&statement, &json!({"other": 1}).into(), &PageBounds::new());

   assert!(matches!(
      result,
      Err(Error::PropertyResolution { ref path, .. }) if path == "filter.a"
   ));
}

// ─── Repeatability ───

#[test]
fn results_are_stable_across_reads() {
   let statement = StatementTemplate::with_names("SELECT * FROM t WHERE a = ?", ["a"]);
   let result = rewrite(
      Dialect::Oracle,
      &statement,
      &json!({"a": 1}).into(),
      &PageBounds::page(2, 5).with_order(Order::asc("a")),
   );

   let first = (result.page_sql().to_string(), result.ordered_values());
   let second = (result.page_sql().to_string(), result.ordered_values());
   assert_eq!(first, second);
   assert_eq!(result.clone(), result);
}
