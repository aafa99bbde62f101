//! Case-insensitive substring search over text columns.

use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{ColumnTrait, Condition};

/// Escape `LIKE` wildcards so user input matches literally.
#[must_use]
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// `lower(column) LIKE %needle%`, with `needle` lowercased and escaped.
pub fn contains_ci(column: impl ColumnTrait, needle: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
    Expr::expr(Func::lower(Expr::col(column.as_column_ref())))
        .like(LikeExpr::new(pattern).escape('\\'))
}

/// Matches when any of `columns` contains `needle`. `None` for a blank query.
pub fn any_contains<C: ColumnTrait>(
    columns: impl IntoIterator<Item = C>,
    needle: Option<&str>,
) -> Option<Condition> {
    let needle = needle.map(str::trim).filter(|s| !s.is_empty())?;
    Some(
        columns
            .into_iter()
            .fold(Condition::any(), |cond, column| cond.add(contains_ci(column, needle))),
    )
}
