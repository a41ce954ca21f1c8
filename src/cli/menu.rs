//! Interactive text menu over the canned analytics queries.
//!
//! Input and output are generic so the whole dialogue can be driven from
//! tests with in-memory buffers.

use crate::config::AnalyticsConfig;
use crate::db::{GenreTrendRow, Store};
use anyhow::Result;
use std::io::{BufRead, Write};

const CHOICE_PROMPT: &str = "Enter your choice (1, 2, 3, 4, 5, exit, help): ";
const YEARS_PROMPT: &str = "Please enter how many years of data you want to see : ";
const GENRE_PROMPT: &str = "Please enter a genre from the list above: ";
const BUZZWORD_SENTINEL: &str = "N";
const BAR_WIDTH: usize = 30;
const MAX_RATING: f64 = 10.0;

pub struct Menu<'a, R, W> {
    store: &'a Store,
    config: &'a AnalyticsConfig,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(store: &'a Store, config: &'a AnalyticsConfig, input: R, output: W) -> Self {
        Self {
            store,
            config,
            input,
            output,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs until `exit` or end of input. Query failures are reported and
    /// the loop carries on; only I/O errors on the terminal end it early.
    pub async fn run(&mut self) -> Result<()> {
        self.print_options()?;

        while let Some(choice) = self.prompt(CHOICE_PROMPT)? {
            let result = match choice.as_str() {
                "1" => self.top_genres().await,
                "2" => self.genre_trend().await,
                "3" => self.director_affinity().await,
                "4" => self.buzzword_search().await,
                "5" => self.revenue_search().await,
                "exit" => break,
                "help" => {
                    self.print_options()?;
                    continue;
                }
                _ => {
                    writeln!(self.output, "Invalid choice.")?;
                    continue;
                }
            };

            if let Err(e) = result {
                writeln!(self.output, "Error while executing query: {e:#}")?;
            }
        }

        Ok(())
    }

    fn print_options(&mut self) -> Result<()> {
        let out = &mut self.output;
        writeln!(out)?;
        writeln!(out, "{:-<47}", "")?;
        writeln!(out, "Select an option:")?;
        writeln!(out, "1 - Show table of top genres by year by revenue")?;
        writeln!(out, "2 - Show revenue and rating by year according to genre")?;
        writeln!(out, "3 - Display directors ordered by average metascore of their movies")?;
        writeln!(
            out,
            "4 - Display the TOP {} movies containing one of the buzzwords, and their descriptions",
            self.config.buzzword_limit
        )?;
        writeln!(
            out,
            "5 - Show movies that contain the buzzword and earn more than average, with their directors"
        )?;
        writeln!(out, "exit - exits from the program")?;
        writeln!(out, "help - shows the options menu")?;
        writeln!(out, "{:-<47}", "")?;
        writeln!(out)?;
        Ok(())
    }

    /// Writes `text`, then reads one line. `None` at end of input.
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Reads a positive year count, reporting anything else.
    fn prompt_years(&mut self) -> Result<Option<i32>> {
        let Some(raw) = self.prompt(YEARS_PROMPT)? else {
            return Ok(None);
        };

        match raw.parse::<i32>() {
            Ok(years) if years > 0 => Ok(Some(years)),
            _ => {
                writeln!(
                    self.output,
                    "Invalid input for years. Please enter a valid number."
                )?;
                Ok(None)
            }
        }
    }

    async fn latest_year(&mut self) -> Result<Option<i32>> {
        if let Some(year) = self.config.latest_year {
            return Ok(Some(year));
        }

        let year = self.store.latest_release_year().await?;
        if year.is_none() {
            writeln!(self.output, "No movies loaded.")?;
        }
        Ok(year)
    }

    // ========================================================================
    // 1 - top genres
    // ========================================================================

    async fn top_genres(&mut self) -> Result<()> {
        let Some(years) = self.prompt_years()? else {
            return Ok(());
        };
        let Some(latest) = self.latest_year().await? else {
            return Ok(());
        };

        let rows = self
            .store
            .top_genres_by_year(latest - years + 1, latest)
            .await?;

        if rows.is_empty() {
            writeln!(self.output, "No data found for the last {years} years.")?;
            return Ok(());
        }

        writeln!(self.output, "{:<6} {:<20} {:>15}", "Year", "Top Genre", "Max Revenue")?;
        for row in rows {
            writeln!(
                self.output,
                "{:<6} {:<20} {:>15}",
                row.year, row.genre, row.revenue
            )?;
        }
        Ok(())
    }

    // ========================================================================
    // 2 - genre trend
    // ========================================================================

    async fn genre_trend(&mut self) -> Result<()> {
        let genres = self.store.genre_names().await?;
        if genres.is_empty() {
            writeln!(
                self.output,
                "No genres available. Please check your database."
            )?;
            return Ok(());
        }

        writeln!(self.output, "Available Genres:")?;
        for genre in &genres {
            writeln!(self.output, "{genre}")?;
        }

        let genre = loop {
            let Some(genre) = self.prompt(GENRE_PROMPT)? else {
                return Ok(());
            };
            if genres.contains(&genre) {
                break genre;
            }
            writeln!(
                self.output,
                "Invalid genre. Please enter a valid genre from the list above."
            )?;
        };

        let Some(years) = self.prompt_years()? else {
            return Ok(());
        };
        let Some(latest) = self.latest_year().await? else {
            return Ok(());
        };

        let rows = self.store.genre_trend(&genre, latest - years + 1).await?;
        if rows.is_empty() {
            writeln!(
                self.output,
                "No data found for the specified genre in the last {years} years."
            )?;
            return Ok(());
        }

        self.print_trend(&genre, years, &rows)
    }

    fn print_trend(&mut self, genre: &str, years: i32, rows: &[GenreTrendRow]) -> Result<()> {
        let max_revenue = rows
            .iter()
            .filter_map(|r| r.avg_revenue)
            .fold(0.0_f64, f64::max);

        writeln!(
            self.output,
            "Average revenue by year for {genre} (last {years} years)"
        )?;
        for row in rows {
            let revenue = row.avg_revenue.unwrap_or(0.0);
            writeln!(
                self.output,
                "{:<6} {:<w$} {:.0}",
                row.year,
                bar(revenue, max_revenue, BAR_WIDTH),
                revenue,
                w = BAR_WIDTH
            )?;
        }

        writeln!(self.output)?;
        writeln!(
            self.output,
            "Average rating by year for {genre} (last {years} years)"
        )?;
        for row in rows {
            let rating = row.avg_rating.unwrap_or(0.0);
            writeln!(
                self.output,
                "{:<6} {:<w$} {:.2}",
                row.year,
                bar(rating, MAX_RATING, BAR_WIDTH),
                rating,
                w = BAR_WIDTH
            )?;
        }
        Ok(())
    }

    // ========================================================================
    // 3 - director affinity
    // ========================================================================

    async fn director_affinity(&mut self) -> Result<()> {
        let directors = self.store.director_affinity().await?;

        writeln!(self.output, "Directors by average metascore:")?;
        for d in &directors {
            match d.avg_metascore {
                Some(score) => writeln!(self.output, "  {} ({score:.1})", d.director)?,
                None => writeln!(self.output, "  {} (no metascore)", d.director)?,
            }
        }

        writeln!(self.output)?;
        let Some(name) = self.prompt("Please enter a director's name: ")? else {
            return Ok(());
        };

        match directors.iter().find(|d| d.director == name) {
            Some(d) => {
                writeln!(
                    self.output,
                    "Director {name} is suitable to work with these actors in this order:"
                )?;
                writeln!(
                    self.output,
                    " (according to average metascore of the movies they worked together on)"
                )?;
                let actors: Vec<&str> = d.actors.iter().map(|a| a.actor.as_str()).collect();
                writeln!(self.output, "{}", actors.join(", "))?;
            }
            None => {
                writeln!(
                    self.output,
                    "No data found for the director named {name}. Please check the spelling or try another name."
                )?;
            }
        }
        Ok(())
    }

    // ========================================================================
    // 4 / 5 - full-text search
    // ========================================================================

    async fn buzzword_search(&mut self) -> Result<()> {
        let mut buzzwords = Vec::new();
        while let Some(word) = self.prompt("Please enter a buzzword. Type 'N' to stop: ")? {
            if word == BUZZWORD_SENTINEL {
                break;
            }
            buzzwords.push(word);
        }

        let rows = self
            .store
            .search_by_buzzwords(&buzzwords, self.config.buzzword_limit)
            .await?;

        writeln!(self.output, "{:_<44}", "")?;
        writeln!(self.output)?;
        if rows.is_empty() {
            writeln!(self.output, "No matching movies found.")?;
        }
        for (index, row) in rows.iter().enumerate() {
            writeln!(self.output, "TOP {} best-match by metascore", index + 1)?;
            writeln!(self.output, "Movie Title: {}", row.title)?;
            writeln!(
                self.output,
                "Description: {}",
                row.description.as_deref().unwrap_or("")
            )?;
            writeln!(self.output, "Metascore: {}", row.metascore)?;
            writeln!(self.output)?;
        }
        Ok(())
    }

    async fn revenue_search(&mut self) -> Result<()> {
        let Some(word) = self.prompt("Please enter the buzzword: ")? else {
            return Ok(());
        };

        let rows = self.store.search_above_average_revenue(&word).await?;

        writeln!(self.output, "{:_<44}", "")?;
        writeln!(self.output)?;
        if rows.is_empty() {
            writeln!(self.output, "No matching movies found.")?;
        }
        for (index, row) in rows.iter().enumerate() {
            writeln!(self.output, "TOP {} by revenue", index + 1)?;
            writeln!(self.output, "title: {}", row.title)?;
            writeln!(self.output, "directors: {}", row.directors)?;
            writeln!(self.output, "revenue: {}", row.revenue)?;
            writeln!(self.output, "average_revenue: {:.2}", row.average_revenue)?;
            writeln!(self.output)?;
        }
        Ok(())
    }
}

/// Horizontal bar of `value` scaled so that `max` fills `width`.
fn bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let len = ((value / max).min(1.0) * width as f64).round() as usize;
    "#".repeat(len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_scales_to_width() {
        assert_eq!(bar(10.0, 10.0, 30).len(), 30);
        assert_eq!(bar(5.0, 10.0, 30).len(), 15);
        assert_eq!(bar(20.0, 10.0, 30).len(), 30);
    }

    #[test]
    fn test_bar_empty_for_zero() {
        assert!(bar(0.0, 10.0, 30).is_empty());
        assert!(bar(3.0, 0.0, 30).is_empty());
    }
}
