//! Human-readable and JSON output for destinations and answers.

use std::io::{self, Write};

use serde::Serialize;

use crate::{
    destination::Destination,
    image::{self, ImageStatus},
    months::Expansion,
    planner::Answer,
    transcript::Transcript,
};

/// A destination as it is emitted in JSON output.
#[derive(Debug, Serialize)]
pub struct DestinationView<'a> {
    #[serde(flatten)]
    pub destination: &'a Destination,
    pub image: ImageStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl<'a> DestinationView<'a> {
    pub fn new(destination: &'a Destination) -> Self {
        Self {
            destination,
            image: ImageStatus::check(&destination.image_url),
            score: None,
        }
    }

    pub fn scored(destination: &'a Destination, score: f32) -> Self {
        Self {
            score: Some(score),
            ..Self::new(destination)
        }
    }
}

fn heading(dest: &Destination) -> String {
    if dest.state.is_empty() {
        dest.name.clone()
    } else {
        format!("{} ({})", dest.name, dest.state)
    }
}

fn write_image(out: &mut impl Write, indent: &str, dest: &Destination) -> io::Result<()> {
    match ImageStatus::check(&dest.image_url) {
        ImageStatus::Available { url } => writeln!(out, "{indent}Image: {url}"),
        ImageStatus::Unavailable { .. } => {
            writeln!(out, "{indent}{}", image::placeholder(&dest.name))
        }
    }
}

/// Print browse results, one block per destination.
pub fn destinations_human(
    out: &mut impl Write,
    dests: &[&Destination],
) -> io::Result<()> {
    if dests.is_empty() {
        writeln!(out, "No destinations found.")?;
        return Ok(());
    }

    for dest in dests {
        writeln!(out, "{}", heading(dest))?;
        if !dest.best_visit_months.is_empty() {
            writeln!(out, "  Best months: {}", dest.best_visit_months)?;
        }
        if let Some(timings) = dest.timings() {
            writeln!(out, "  Timings: {timings}")?;
        }
        if !dest.description.is_empty() {
            writeln!(out, "  {}", dest.description)?;
        }
        if !dest.map_link.is_empty() {
            writeln!(out, "  Map: {}", dest.map_link)?;
        }
        write_image(out, "  ", dest)?;
        writeln!(out)?;
    }
    writeln!(out, "{} destination(s)", dests.len())
}

pub fn destinations_json(
    out: &mut impl Write,
    dests: &[&Destination],
) -> io::Result<()> {
    let views: Vec<DestinationView<'_>> =
        dests.iter().map(|d| DestinationView::new(d)).collect();
    serde_json::to_writer(&mut *out, &views)?;
    writeln!(out)
}

/// Print ranked results with their scores.
pub fn answer_human(out: &mut impl Write, answer: &Answer<'_>) -> io::Result<()> {
    if answer.is_empty() {
        writeln!(out, "No destinations matched your query.")?;
        return Ok(());
    }

    for (rank, (dest, score)) in answer.results.iter().enumerate() {
        write!(out, "{:>3}. [{:.3}] {}", rank + 1, score, heading(dest))?;
        match &dest.category {
            Some(category) => writeln!(out, " - {category}")?,
            None => writeln!(out)?,
        }
        if !dest.description.is_empty() {
            writeln!(out, "     {}", dest.description)?;
        }
        if !dest.map_link.is_empty() {
            writeln!(out, "     Map: {}", dest.map_link)?;
        }
    }
    writeln!(
        out,
        "\n{} result(s) from {} candidate(s)",
        answer.results.len(),
        answer.candidates
    )
}

pub fn answer_json(out: &mut impl Write, answer: &Answer<'_>) -> io::Result<()> {
    #[derive(Serialize)]
    struct Json<'a> {
        query: &'a str,
        candidates: usize,
        result_count: usize,
        results: Vec<DestinationView<'a>>,
    }

    let json = Json {
        query: &answer.query,
        candidates: answer.candidates,
        result_count: answer.results.len(),
        results: answer
            .results
            .iter()
            .map(|(d, s)| DestinationView::scored(d, *s))
            .collect(),
    };
    serde_json::to_writer(&mut *out, &json)?;
    writeln!(out)
}

pub fn transcript_human(out: &mut impl Write, transcript: &Transcript) -> io::Result<()> {
    for message in transcript.messages() {
        writeln!(out, "{}: {}", message.role, message.content)?;
    }
    Ok(())
}

pub fn expansion_human(out: &mut impl Write, expansion: &Expansion) -> io::Result<()> {
    if expansion.months.is_empty() {
        writeln!(out, "(no months)")?;
    } else {
        writeln!(out, "{}", expansion.months)?;
    }
    if expansion.is_partial() {
        writeln!(out, "skipped: {}", expansion.skipped.join(", "))?;
    }
    Ok(())
}
