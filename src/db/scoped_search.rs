// src/db/scoped_search.rs
//
// Busca paginada com escopo de conta. Uma única implementação; cada entidade
// só descreve a sua tabela num `SearchSpec`.

use chrono::NaiveDate;
use sqlx::{postgres::PgRow, FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::common::{
    error::AppError,
    pagination::{ListQuery, PageParams, Paginated},
};

/// Junção opcional com a entidade referenciada (ex.: contrato -> cliente).
#[derive(Debug, Clone, Copy)]
pub struct JoinSpec {
    pub table: &'static str,
    pub alias: &'static str,
    /// Coluna da tabela principal que aponta para `table.id`.
    pub foreign_key: &'static str,
    /// Só as colunas que a listagem expõe, já com os aliases `*_ref_*`.
    pub projection: &'static str,
    pub text_columns: &'static [&'static str],
}

#[derive(Debug, Clone, Copy)]
pub struct SearchSpec {
    pub table: &'static str,
    pub alias: &'static str,
    pub join: Option<JoinSpec>,
    pub text_columns: &'static [&'static str],
    pub status_column: Option<&'static str>,
    pub category_column: Option<&'static str>,
    pub date_column: Option<&'static str>,
    pub order_by: &'static str,
    pub default_limit: i64,
}

impl SearchSpec {
    pub fn projection(&self) -> String {
        match self.join {
            Some(join) => format!("{}.*, {}", self.alias, join.projection),
            None => format!("{}.*", self.alias),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Equals { column: &'static str, value: String },
    OnOrAfter { column: &'static str, date: NaiveDate },
    OnOrBefore { column: &'static str, date: NaiveDate },
}

/// De quem são os registros buscados.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Só as linhas da conta.
    Tenant(Uuid),
    /// Sem filtro de conta: apenas a própria tabela `accounts`, para o super admin.
    Platform,
}

#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub scope: Scope,
    pub page: PageParams,
    pub search: Option<String>,
    pub filters: Vec<Filter>,
}

impl SearchRequest {
    pub fn new(scope: Scope, page: PageParams) -> Self {
        Self {
            scope,
            page,
            search: None,
            filters: Vec::new(),
        }
    }

    /// Termo vazio ou só com espaços = sem filtro de texto.
    pub fn with_search(mut self, term: &str) -> Self {
        let term = term.trim();
        self.search = (!term.is_empty()).then(|| term.to_string());
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Monta a busca a partir da query string. Só aplica os filtros que a
    /// entidade declara; datas inválidas são descartadas.
    pub fn from_query(scope: Scope, query: &ListQuery, spec: &SearchSpec) -> Self {
        let page = PageParams::coerce(
            query.page.as_deref(),
            query.limit.as_deref(),
            spec.default_limit,
        );
        let mut request = Self::new(scope, page)
            .with_search(query.search.as_deref().unwrap_or_default());

        if let (Some(column), Some(value)) = (spec.status_column, non_blank(&query.status)) {
            request = request.with_filter(Filter::Equals { column, value });
        }
        if let (Some(column), Some(value)) = (spec.category_column, non_blank(&query.category)) {
            request = request.with_filter(Filter::Equals { column, value });
        }
        if let Some(column) = spec.date_column {
            if let Some(date) = parse_date(&query.from) {
                request = request.with_filter(Filter::OnOrAfter { column, date });
            }
            if let Some(date) = parse_date(&query.to) {
                request = request.with_filter(Filter::OnOrBefore { column, date });
            }
        }

        request
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_date(value: &Option<String>) -> Option<NaiveDate> {
    value
        .as_deref()
        .and_then(|v| NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d").ok())
}

/// `%termo%` com os curingas do LIKE escapados (a barra é o escape padrão do Postgres).
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

fn push_source(qb: &mut QueryBuilder<'static, Postgres>, spec: &SearchSpec) {
    qb.push(" FROM ").push(spec.table).push(" ").push(spec.alias);

    // A junção também é limitada à mesma conta.
    if let Some(join) = spec.join {
        qb.push(format!(
            " LEFT JOIN {table} {j} ON {j}.id = {a}.{fk} AND {j}.account_id = {a}.account_id",
            table = join.table,
            j = join.alias,
            a = spec.alias,
            fk = join.foreign_key,
        ));
    }
}

fn push_conditions(qb: &mut QueryBuilder<'static, Postgres>, spec: &SearchSpec, request: &SearchRequest) {
    match request.scope {
        Scope::Tenant(account_id) => {
            qb.push(" WHERE ")
                .push(spec.alias)
                .push(".account_id = ")
                .push_bind(account_id);
        }
        Scope::Platform => {
            qb.push(" WHERE TRUE");
        }
    }

    if let Some(term) = &request.search {
        let pattern = like_pattern(term);
        let join_columns = spec.join.map(|j| j.text_columns).unwrap_or_default();

        qb.push(" AND (");
        let mut branches = 0;
        for column in spec.text_columns.iter().chain(join_columns) {
            if branches > 0 {
                qb.push(" OR ");
            }
            qb.push(*column).push(" ILIKE ").push_bind(pattern.clone());
            branches += 1;
        }

        // Um UUID válido também casa com o próprio id do registro.
        if let Ok(id) = Uuid::parse_str(term) {
            if branches > 0 {
                qb.push(" OR ");
            }
            qb.push(spec.alias).push(".id = ").push_bind(id);
            branches += 1;
        }

        if branches == 0 {
            qb.push("FALSE");
        }
        qb.push(")");
    }

    for filter in &request.filters {
        match filter {
            Filter::Equals { column, value } => {
                qb.push(" AND ").push(*column).push("::text = ").push_bind(value.clone());
            }
            Filter::OnOrAfter { column, date } => {
                qb.push(" AND ").push(*column).push("::date >= ").push_bind(*date);
            }
            Filter::OnOrBefore { column, date } => {
                qb.push(" AND ").push(*column).push("::date <= ").push_bind(*date);
            }
        }
    }
}

/// `SELECT <projeção> FROM <tabela> [LEFT JOIN ...]`, sem WHERE.
pub fn select_listing(spec: &SearchSpec) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {}", spec.projection()));
    push_source(&mut qb, spec);
    qb
}

pub fn build_page_query(spec: &SearchSpec, request: &SearchRequest) -> QueryBuilder<'static, Postgres> {
    let mut qb = select_listing(spec);
    push_conditions(&mut qb, spec, request);

    // O id desempata registros com a mesma data, deixando a ordem estável.
    qb.push(" ORDER BY ")
        .push(spec.order_by)
        .push(", ")
        .push(spec.alias)
        .push(".id");
    qb.push(" LIMIT ")
        .push_bind(request.page.limit)
        .push(" OFFSET ")
        .push_bind(request.page.offset());
    qb
}

/// Um registro pelo id, sempre dentro da conta.
pub fn build_lookup_query(spec: &SearchSpec, account_id: Uuid, id: Uuid) -> QueryBuilder<'static, Postgres> {
    let mut qb = select_listing(spec);
    qb.push(" WHERE ")
        .push(spec.alias)
        .push(".id = ")
        .push_bind(id)
        .push(" AND ")
        .push(spec.alias)
        .push(".account_id = ")
        .push_bind(account_id);
    qb
}

/// Conta o conjunto filtrado inteiro, ignorando LIMIT/OFFSET.
pub fn build_count_query(spec: &SearchSpec, request: &SearchRequest) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*)");
    push_source(&mut qb, spec);
    push_conditions(&mut qb, spec, request);
    qb
}

/// Página + total. As duas consultas são independentes e rodam em paralelo.
pub async fn find_page<T>(
    pool: &PgPool,
    spec: &SearchSpec,
    request: &SearchRequest,
) -> Result<Paginated<T>, AppError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let mut page_query = build_page_query(spec, request);
    let mut count_query = build_count_query(spec, request);

    let (rows, total) = tokio::try_join!(
        page_query.build_query_as::<T>().fetch_all(pool),
        count_query.build_query_scalar::<i64>().fetch_one(pool),
    )?;

    Ok(Paginated::new(rows, total, request.page))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTRACTS: SearchSpec = SearchSpec {
        table: "contracts",
        alias: "c",
        join: Some(JoinSpec {
            table: "customers",
            alias: "cu",
            foreign_key: "customer_id",
            projection: "cu.id AS customer_ref_id, cu.name AS customer_ref_name, cu.email AS customer_ref_email",
            text_columns: &["cu.name", "cu.email"],
        }),
        text_columns: &["c.title"],
        status_column: Some("c.status"),
        category_column: None,
        date_column: Some("c.start_date"),
        order_by: "c.created_at DESC",
        default_limit: 10,
    };

    const PRODUCTS: SearchSpec = SearchSpec {
        table: "products",
        alias: "p",
        join: None,
        text_columns: &["p.name", "p.sku"],
        status_column: None,
        category_column: Some("p.category"),
        date_column: None,
        order_by: "p.created_at DESC",
        default_limit: 10,
    };

    fn request() -> SearchRequest {
        SearchRequest::new(Scope::Tenant(Uuid::new_v4()), PageParams { page: 1, limit: 10 })
    }

    #[test]
    fn every_query_is_scoped_to_the_account() {
        let page = build_page_query(&PRODUCTS, &request());
        let count = build_count_query(&PRODUCTS, &request());

        assert_eq!(
            page.sql(),
            "SELECT p.* FROM products p WHERE p.account_id = $1 ORDER BY p.created_at DESC, p.id LIMIT $2 OFFSET $3"
        );
        assert_eq!(count.sql(), "SELECT COUNT(*) FROM products p WHERE p.account_id = $1");
    }

    #[test]
    fn join_is_projected_and_scoped() {
        let page = build_page_query(&CONTRACTS, &request());
        assert!(page.sql().starts_with(
            "SELECT c.*, cu.id AS customer_ref_id, cu.name AS customer_ref_name, cu.email AS customer_ref_email \
             FROM contracts c LEFT JOIN customers cu ON cu.id = c.customer_id AND cu.account_id = c.account_id"
        ));
    }

    #[test]
    fn text_search_covers_own_and_joined_columns() {
        let req = request().with_search("acme");
        let count = build_count_query(&CONTRACTS, &req);

        assert!(count.sql().ends_with(
            "WHERE c.account_id = $1 AND (c.title ILIKE $2 OR cu.name ILIKE $3 OR cu.email ILIKE $4)"
        ));
        assert!(!count.sql().contains("c.id ="));
    }

    #[test]
    fn uuid_term_adds_an_id_branch() {
        let id = Uuid::new_v4();
        let req = request().with_search(&id.to_string());
        let count = build_count_query(&CONTRACTS, &req);

        assert!(count.sql().ends_with(
            "AND (c.title ILIKE $2 OR cu.name ILIKE $3 OR cu.email ILIKE $4 OR c.id = $5)"
        ));
    }

    #[test]
    fn blank_search_adds_no_text_condition() {
        let req = request().with_search("   ");
        assert!(req.search.is_none());
        assert!(!build_count_query(&CONTRACTS, &req).sql().contains("ILIKE"));
    }

    #[test]
    fn filters_follow_the_search_branch() {
        let req = request()
            .with_search("acme")
            .with_filter(Filter::Equals { column: "c.status", value: "active".into() })
            .with_filter(Filter::OnOrAfter {
                column: "c.start_date",
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            });
        let page = build_page_query(&CONTRACTS, &req);

        assert!(page.sql().contains(
            "cu.email ILIKE $4) AND c.status::text = $5 AND c.start_date::date >= $6 ORDER BY c.created_at DESC, c.id LIMIT $7 OFFSET $8"
        ));
    }

    #[test]
    fn from_query_applies_only_declared_filters() {
        let query = ListQuery {
            page: Some("abc".into()),
            limit: Some("xyz".into()),
            search: Some(" acme ".into()),
            status: Some("active".into()),
            category: Some("ignored".into()),
            from: Some("2024-01-01".into()),
            to: Some("not-a-date".into()),
        };
        let account_id = Uuid::new_v4();
        let req = SearchRequest::from_query(Scope::Tenant(account_id), &query, &CONTRACTS);

        assert_eq!(req.scope, Scope::Tenant(account_id));
        assert_eq!(req.page, PageParams { page: 1, limit: 10 });
        assert_eq!(req.search.as_deref(), Some("acme"));
        assert_eq!(
            req.filters,
            vec![
                Filter::Equals { column: "c.status", value: "active".into() },
                Filter::OnOrAfter {
                    column: "c.start_date",
                    date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                },
            ]
        );
    }

    #[test]
    fn from_query_uses_entity_default_limit() {
        let spec = SearchSpec { default_limit: 50, ..PRODUCTS };
        let req = SearchRequest::from_query(Scope::Tenant(Uuid::new_v4()), &ListQuery::default(), &spec);
        assert_eq!(req.page, PageParams { page: 1, limit: 50 });
        assert!(req.filters.is_empty());
    }

    #[test]
    fn platform_scope_lists_every_account() {
        let accounts = SearchSpec {
            table: "accounts",
            alias: "a",
            text_columns: &["a.name"],
            status_column: Some("a.status"),
            category_column: None,
            order_by: "a.created_at DESC",
            ..PRODUCTS
        };
        let req = SearchRequest::new(Scope::Platform, PageParams { page: 2, limit: 5 })
            .with_search("polo")
            .with_filter(Filter::Equals { column: "a.status", value: "active".into() });

        assert_eq!(
            build_count_query(&accounts, &req).sql(),
            "SELECT COUNT(*) FROM accounts a WHERE TRUE AND (a.name ILIKE $1) AND a.status::text = $2"
        );
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(like_pattern("acme"), "%acme%");
        assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }
}
