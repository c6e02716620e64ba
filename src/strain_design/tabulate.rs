//! Result tabulation for knockout searches
use std::fmt::Write as _;

use crate::strain_design::evolutionary::SolutionPopulation;
use crate::strain_design::DesignError;

/// One design rendered for reporting
#[derive(Clone, Debug, PartialEq)]
pub struct DesignRow {
    pub knockouts: Vec<String>,
    pub knockout_count: usize,
    pub fitness: Vec<f64>,
}

/// A sortable table of knockout designs
#[derive(Clone, Debug)]
pub struct DesignTable {
    pub objectives: Vec<String>,
    pub rows: Vec<DesignRow>,
}

impl DesignTable {
    pub fn from_population(population: &SolutionPopulation) -> Self {
        let rows = population
            .solutions
            .iter()
            .map(|solution| DesignRow {
                knockouts: solution.knockouts.clone(),
                knockout_count: solution.knockouts.len(),
                fitness: solution.fitness.clone(),
            })
            .collect();
        DesignTable {
            objectives: population.objectives.clone(),
            rows,
        }
    }

    /// Drop a shared identifier prefix (such as "G_" or "R_") from every
    /// knockout name, for readable reports
    pub fn strip_prefix(&mut self, prefix: &str) -> &mut Self {
        for row in &mut self.rows {
            for id in &mut row.knockouts {
                if let Some(stripped) = id.strip_prefix(prefix) {
                    *id = stripped.to_string();
                }
            }
        }
        self
    }

    /// Order rows by knockout set size, smallest designs first
    pub fn sort_by_knockout_count(&mut self) -> &mut Self {
        self.rows.sort_by_key(|row| row.knockout_count);
        self
    }

    /// Order rows by one objective column, best scores first
    pub fn sort_by_objective(&mut self, column: usize) -> Result<&mut Self, DesignError> {
        if column >= self.objectives.len() {
            return Err(DesignError::ColumnOutOfRange(column));
        }
        self.rows
            .sort_by(|a, b| b.fitness[column].total_cmp(&a.fitness[column]));
        Ok(self)
    }

    /// Pairs of objective scores for plotting one objective against another
    pub fn scatter(&self, x: usize, y: usize) -> Result<Vec<(f64, f64)>, DesignError> {
        if x >= self.objectives.len() {
            return Err(DesignError::ColumnOutOfRange(x));
        }
        if y >= self.objectives.len() {
            return Err(DesignError::ColumnOutOfRange(y));
        }
        Ok(self
            .rows
            .iter()
            .map(|row| (row.fitness[x], row.fitness[y]))
            .collect())
    }

    /// Render the objective trade-off as a standalone SVG scatter plot
    pub fn scatter_svg(
        &self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> Result<String, DesignError> {
        let points = self.scatter(x, y)?;
        let margin = 40.0;
        let w = width as f64;
        let h = height as f64;

        let (mut x_max, mut y_max) = (0.0_f64, 0.0_f64);
        for (px, py) in &points {
            x_max = x_max.max(*px);
            y_max = y_max.max(*py);
        }
        if x_max <= 0.0 {
            x_max = 1.0;
        }
        if y_max <= 0.0 {
            y_max = 1.0;
        }
        let scale_x = |v: f64| margin + v / x_max * (w - 2.0 * margin);
        let scale_y = |v: f64| h - margin - v / y_max * (h - 2.0 * margin);

        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        );
        let _ = writeln!(
            svg,
            r##"<line x1="{margin}" y1="{y0}" x2="{x1}" y2="{y0}" stroke="#333"/>"##,
            y0 = h - margin,
            x1 = w - margin,
        );
        let _ = writeln!(
            svg,
            r##"<line x1="{margin}" y1="{margin}" x2="{margin}" y2="{y0}" stroke="#333"/>"##,
            y0 = h - margin,
        );
        for (px, py) in &points {
            let _ = writeln!(
                svg,
                r##"<circle cx="{:.2}" cy="{:.2}" r="4" fill="#4c72b0"/>"##,
                scale_x(*px),
                scale_y(*py),
            );
        }
        let _ = writeln!(
            svg,
            r#"<text x="{:.0}" y="{:.0}" text-anchor="middle" font-size="12">{}</text>"#,
            w / 2.0,
            h - 8.0,
            self.objectives[x],
        );
        let _ = writeln!(
            svg,
            r#"<text x="12" y="{:.0}" transform="rotate(-90 12 {:.0})" text-anchor="middle" font-size="12">{}</text>"#,
            h / 2.0,
            h / 2.0,
            self.objectives[y],
        );
        svg.push_str("</svg>\n");
        Ok(svg)
    }
}

impl std::fmt::Display for DesignTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let knockout_width = self
            .rows
            .iter()
            .map(|row| row.knockouts.join(", ").len())
            .chain(std::iter::once("knockouts".len()))
            .max()
            .unwrap_or(0);

        write!(f, "{:<width$}  {:>5}", "knockouts", "count", width = knockout_width)?;
        for objective in &self.objectives {
            write!(f, "  {objective:>14}")?;
        }
        writeln!(f)?;

        for row in &self.rows {
            let names = row.knockouts.join(", ");
            write!(f, "{names:<knockout_width$}  {:>5}", row.knockout_count)?;
            for value in &row.fitness {
                write!(f, "  {value:>14.4}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
