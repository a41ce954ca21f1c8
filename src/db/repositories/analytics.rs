use crate::entities::prelude::*;
use sea_orm::{
    ConnectionTrait, DbBackend, DbErr, EntityTrait, FromQueryResult, PaginatorTrait, Statement,
};

/// Read-only reporting queries over a loaded store.
pub struct AnalyticsRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> AnalyticsRepository<'a, C> {
    #[must_use]
    pub const fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// For each year in `from_year..=to_year`, the genre(s) owning the
    /// highest single-movie revenue of that year. Newest year first; ties
    /// yield one row per genre.
    pub async fn top_genres_by_year(
        &self,
        from_year: i32,
        to_year: i32,
    ) -> Result<Vec<TopGenreRow>, DbErr> {
        let sql = r"
            WITH genre_year AS (
                SELECT m.release_year AS year,
                       mga.genre_id AS genre_id,
                       MAX(mm.revenue) AS revenue
                FROM movie m
                JOIN movie_metrics mm ON mm.metrics_id = m.metrics_id
                JOIN movie_genre_association mga ON mga.movie_id = m.movie_id
                WHERE m.release_year BETWEEN ? AND ?
                  AND mm.revenue IS NOT NULL
                GROUP BY m.release_year, mga.genre_id
            ),
            year_max AS (
                SELECT year, MAX(revenue) AS revenue
                FROM genre_year
                GROUP BY year
            )
            SELECT gy.year AS year, g.name AS genre, gy.revenue AS revenue
            FROM genre_year gy
            JOIN year_max ym ON ym.year = gy.year AND ym.revenue = gy.revenue
            JOIN genre g ON g.genre_id = gy.genre_id
            ORDER BY gy.year DESC, g.name
        ";

        TopGenreRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Sqlite,
            sql,
            [from_year.into(), to_year.into()],
        ))
        .all(self.conn)
        .await
    }

    /// Average revenue and rating of `genre` movies per year from
    /// `since_year` on, oldest year first.
    pub async fn genre_trend(
        &self,
        genre: &str,
        since_year: i32,
    ) -> Result<Vec<GenreTrendRow>, DbErr> {
        let sql = r"
            SELECT m.release_year AS year,
                   AVG(mm.revenue) AS avg_revenue,
                   AVG(mm.rating) AS avg_rating,
                   COUNT(*) AS movies
            FROM movie m
            JOIN movie_metrics mm ON mm.metrics_id = m.metrics_id
            JOIN movie_genre_association mga ON mga.movie_id = m.movie_id
            JOIN genre g ON g.genre_id = mga.genre_id
            WHERE g.name = ? AND m.release_year >= ?
            GROUP BY m.release_year
            ORDER BY m.release_year
        ";

        GenreTrendRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Sqlite,
            sql,
            [genre.into(), since_year.into()],
        ))
        .all(self.conn)
        .await
    }

    /// Directors ranked by the average metascore of their movies, each with
    /// the actors they worked with ranked by the average metascore of the
    /// movies they share.
    pub async fn director_affinity(&self) -> Result<Vec<DirectorAffinity>, DbErr> {
        let directors_sql = r"
            SELECT d.full_name AS director, AVG(mm.metascore) AS avg_metascore
            FROM worker d
            JOIN role r ON r.role_id = d.role_id AND r.name = 'director'
            JOIN movie_worker_association mwa ON mwa.worker_id = d.worker_id
            JOIN movie m ON m.movie_id = mwa.movie_id
            JOIN movie_metrics mm ON mm.metrics_id = m.metrics_id
            GROUP BY d.full_name
            ORDER BY avg_metascore DESC, d.full_name
        ";

        let pairs_sql = r"
            SELECT d.full_name AS director, a.full_name AS actor,
                   AVG(mm.metascore) AS avg_metascore
            FROM worker d
            JOIN role rd ON rd.role_id = d.role_id AND rd.name = 'director'
            JOIN movie_worker_association mwd ON mwd.worker_id = d.worker_id
            JOIN movie_worker_association mwa ON mwa.movie_id = mwd.movie_id
            JOIN worker a ON a.worker_id = mwa.worker_id
            JOIN role ra ON ra.role_id = a.role_id AND ra.name = 'actor'
            JOIN movie m ON m.movie_id = mwd.movie_id
            JOIN movie_metrics mm ON mm.metrics_id = m.metrics_id
            GROUP BY d.full_name, a.full_name
            ORDER BY d.full_name, avg_metascore DESC, a.full_name
        ";

        let directors = DirectorScoreRow::find_by_statement(Statement::from_string(
            DbBackend::Sqlite,
            directors_sql,
        ))
        .all(self.conn)
        .await?;

        let pairs = DirectorActorRow::find_by_statement(Statement::from_string(
            DbBackend::Sqlite,
            pairs_sql,
        ))
        .all(self.conn)
        .await?;

        Ok(group_affinity(directors, pairs))
    }

    /// Movies whose description matches any of `terms`, with a metascore,
    /// best metascore first.
    pub async fn search_by_buzzwords(
        &self,
        terms: &[String],
        limit: u64,
    ) -> Result<Vec<BuzzwordMatchRow>, DbErr> {
        let Some(query) = fts_any_of(terms) else {
            return Ok(Vec::new());
        };

        let sql = r"
            SELECT m.movie_id AS movie_id, m.title AS title,
                   m.description AS description, mm.metascore AS metascore
            FROM movie_fts
            JOIN movie m ON m.movie_id = movie_fts.rowid
            JOIN movie_metrics mm ON mm.metrics_id = m.metrics_id
            WHERE movie_fts MATCH ? AND mm.metascore IS NOT NULL
            ORDER BY mm.metascore DESC, m.movie_id
            LIMIT ?
        ";

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        BuzzwordMatchRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Sqlite,
            sql,
            [query.into(), limit.into()],
        ))
        .all(self.conn)
        .await
    }

    /// Movies whose description matches `term` and whose revenue exceeds the
    /// average revenue of all matching movies, highest revenue first.
    pub async fn search_above_average_revenue(
        &self,
        term: &str,
    ) -> Result<Vec<RevenueMatchRow>, DbErr> {
        let Some(query) = fts_any_of(&[term.to_string()]) else {
            return Ok(Vec::new());
        };

        let sql = r"
            WITH relevant AS (
                SELECT m.movie_id AS movie_id, m.title AS title, mm.revenue AS revenue,
                       AVG(mm.revenue) OVER () AS average_revenue
                FROM movie_fts
                JOIN movie m ON m.movie_id = movie_fts.rowid
                JOIN movie_metrics mm ON mm.metrics_id = m.metrics_id
                WHERE movie_fts MATCH ? AND mm.revenue IS NOT NULL
            )
            SELECT r.title AS title,
                   group_concat(w.full_name, ', ') AS directors,
                   r.revenue AS revenue,
                   r.average_revenue AS average_revenue
            FROM relevant r
            JOIN movie_worker_association mwa ON mwa.movie_id = r.movie_id
            JOIN worker w ON w.worker_id = mwa.worker_id
            JOIN role ro ON ro.role_id = w.role_id AND ro.name = 'director'
            WHERE r.revenue > r.average_revenue
            GROUP BY r.movie_id
            ORDER BY r.revenue DESC, r.movie_id
        ";

        RevenueMatchRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Sqlite,
            sql,
            [query.into()],
        ))
        .all(self.conn)
        .await
    }

    pub async fn counts(&self) -> Result<Vec<TableCount>, DbErr> {
        Ok(vec![
            TableCount::new("certificate", Certificate::find().count(self.conn).await?),
            TableCount::new("genre", Genre::find().count(self.conn).await?),
            TableCount::new("role", Role::find().count(self.conn).await?),
            TableCount::new("worker", Worker::find().count(self.conn).await?),
            TableCount::new("movie", Movie::find().count(self.conn).await?),
            TableCount::new("movie_metrics", MovieMetrics::find().count(self.conn).await?),
            TableCount::new(
                "movie_genre_association",
                MovieGenreAssociation::find().count(self.conn).await?,
            ),
            TableCount::new(
                "movie_worker_association",
                MovieWorkerAssociation::find().count(self.conn).await?,
            ),
        ])
    }
}

/// Builds an FTS5 query matching any word of any of `terms`. Every
/// whitespace-separated word becomes a quoted string, so operators and column
/// filters in user input are inert. Returns `None` when no term has content.
#[must_use]
pub fn fts_any_of(terms: &[String]) -> Option<String> {
    let quoted: Vec<String> = terms
        .iter()
        .flat_map(|t| t.split_whitespace())
        .map(|word| format!("\"{}\"", word.replace('"', "\"\"")))
        .collect();

    if quoted.is_empty() {
        None
    } else {
        Some(quoted.join(" OR "))
    }
}

fn group_affinity(
    directors: Vec<DirectorScoreRow>,
    pairs: Vec<DirectorActorRow>,
) -> Vec<DirectorAffinity> {
    let mut actors: std::collections::HashMap<String, Vec<ActorScore>> =
        std::collections::HashMap::new();
    for pair in pairs {
        actors.entry(pair.director).or_default().push(ActorScore {
            actor: pair.actor,
            avg_metascore: pair.avg_metascore,
        });
    }

    directors
        .into_iter()
        .map(|d| DirectorAffinity {
            actors: actors.remove(&d.director).unwrap_or_default(),
            director: d.director,
            avg_metascore: d.avg_metascore,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct TopGenreRow {
    pub year: i32,
    pub genre: String,
    pub revenue: i64,
}

#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct GenreTrendRow {
    pub year: i32,
    pub avg_revenue: Option<f64>,
    pub avg_rating: Option<f64>,
    pub movies: i64,
}

#[derive(Debug, Clone, FromQueryResult)]
struct DirectorScoreRow {
    director: String,
    avg_metascore: Option<f64>,
}

#[derive(Debug, Clone, FromQueryResult)]
struct DirectorActorRow {
    director: String,
    actor: String,
    avg_metascore: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActorScore {
    pub actor: String,
    pub avg_metascore: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectorAffinity {
    pub director: String,
    pub avg_metascore: Option<f64>,
    /// Best shared metascore first.
    pub actors: Vec<ActorScore>,
}

#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct BuzzwordMatchRow {
    pub movie_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub metascore: i32,
}

#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct RevenueMatchRow {
    pub title: String,
    pub directors: String,
    pub revenue: i64,
    pub average_revenue: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableCount {
    pub table: &'static str,
    pub rows: u64,
}

impl TableCount {
    const fn new(table: &'static str, rows: u64) -> Self {
        Self { table, rows }
    }
}
