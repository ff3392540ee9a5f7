//! Positioned text runs built from pdf-extract's glyph stream.
//!
//! pdf-extract interprets the page (fonts, encodings, CMaps, text and
//! graphics state) and reports every glyph with its rendering matrix and
//! advance width. [`RunCollector`] stitches consecutive glyphs back into runs
//! and starts a new run when the baseline changes or the horizontal gap to
//! the previous glyph is wide enough to be a column break.

use pdf_extract::{MediaBox, OutputDev, OutputError, Transform};

/// A piece of text drawn at one position.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    /// Left edge in page space.
    pub x: f32,
    /// Baseline in page space (grows upwards).
    pub y: f32,
    /// Effective font size in page space.
    pub font_size: f32,
    /// Decoded text.
    pub text: String,
}

/// Runs sharing a baseline, left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub y: f32,
    pub runs: Vec<TextRun>,
}

#[derive(Debug)]
struct PendingRun {
    run: TextRun,
    /// Right edge of the last visible glyph.
    ink_end: f32,
}

/// Collects glyphs from [`pdf_extract::output_doc_page`] into text runs.
#[derive(Debug)]
pub struct RunCollector {
    split_gap_em: f32,
    runs: Vec<TextRun>,
    current: Option<PendingRun>,
}

impl RunCollector {
    /// Create a collector. A horizontal gap of more than `split_gap_em` ems
    /// between two glyphs starts a new run.
    pub fn new(split_gap_em: f32) -> Self {
        Self {
            split_gap_em,
            runs: Vec::new(),
            current: None,
        }
    }

    /// Finish the pending run and return everything collected.
    pub fn into_runs(mut self) -> Vec<TextRun> {
        self.flush();
        self.runs
    }

    fn push_glyph(&mut self, x: f32, y: f32, size: f32, advance: f32, text: &str) {
        let blank = text.trim().is_empty();
        let em = if size > 0.0 { size } else { 1.0 };

        if let Some(pending) = &self.current {
            let gap = x - pending.ink_end;
            let new_line = (y - pending.run.y).abs() > 0.5 * em;
            let column_break = !blank && (gap > self.split_gap_em * em || gap < -em);
            if new_line || column_break {
                self.flush();
            }
        }

        if let Some(pending) = self.current.as_mut() {
            pending.run.text.push_str(text);
            if !blank {
                pending.ink_end = x + advance;
            }
            return;
        }

        // runs never start with whitespace
        if !blank {
            self.current = Some(PendingRun {
                run: TextRun {
                    x,
                    y,
                    font_size: size,
                    text: text.to_string(),
                },
                ink_end: x + advance,
            });
        }
    }

    fn flush(&mut self) {
        if let Some(PendingRun { run, .. }) = self.current.take() {
            let text = run.text.trim();
            if !text.is_empty() {
                self.runs.push(TextRun {
                    text: text.to_string(),
                    ..run
                });
            }
        }
    }
}

impl OutputDev for RunCollector {
    fn begin_page(
        &mut self,
        _page_num: u32,
        _media_box: &MediaBox,
        _art_box: Option<(f64, f64, f64, f64)>,
    ) -> Result<(), OutputError> {
        self.flush();
        Ok(())
    }

    fn end_page(&mut self) -> Result<(), OutputError> {
        self.flush();
        Ok(())
    }

    fn output_character(
        &mut self,
        trm: &Transform,
        width: f64,
        spacing: f64,
        font_size: f64,
        char: &str,
    ) -> Result<(), OutputError> {
        let (x, y) = (trm.m31, trm.m32);
        if !x.is_finite() || !y.is_finite() {
            return Ok(());
        }

        // `width` is in text space units per unit of font size; the rendering
        // matrix carries text, horizontal scaling and CTM transforms.
        let size = font_size * trm.m21.hypot(trm.m22);
        let advance = (width * font_size + spacing) * trm.m11.hypot(trm.m12);
        let finite_or_zero = |v: f64| if v.is_finite() { v as f32 } else { 0.0 };

        self.push_glyph(
            x as f32,
            y as f32,
            finite_or_zero(size),
            finite_or_zero(advance),
            char,
        );
        Ok(())
    }

    fn begin_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_line(&mut self) -> Result<(), OutputError> {
        Ok(())
    }
}

/// Group runs into lines, top of page first.
///
/// A run joins a line when its baseline is within `tolerance` of the line's
/// first run.
pub fn group_lines(mut runs: Vec<TextRun>, tolerance: f32) -> Vec<TextLine> {
    runs.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

    let mut lines: Vec<TextLine> = Vec::new();
    for run in runs {
        match lines.last_mut() {
            Some(line) if (line.y - run.y).abs() <= tolerance => line.runs.push(run),
            _ => lines.push(TextLine {
                y: run.y,
                runs: vec![run],
            }),
        }
    }

    for line in &mut lines {
        line.runs.sort_by(|a, b| a.x.total_cmp(&b.x));
    }

    lines
}
