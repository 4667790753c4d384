//! Per-level checks
//!
//! Each function inspects the shared [`ValidationContext`] and returns the
//! diagnostics for its level. They never look at each other's output.

use super::engine::ValidationContext;
use super::types::Diagnostic;
use crate::parser::LinkKind;
use crate::schema::{
    CanonicalSectionName, DiagnosticCode, ValidationLevel, TOKEN_ZONE_DEGRADATION,
};

pub(crate) fn run_level(level: ValidationLevel, ctx: &ValidationContext<'_>) -> Vec<Diagnostic> {
    match level {
        ValidationLevel::Parseable => parseable(ctx),
        ValidationLevel::Structural => structural(ctx),
        ValidationLevel::Content => content(ctx),
        ValidationLevel::BestPractices => best_practices(ctx),
        ValidationLevel::Extended => extended(ctx),
    }
}

fn parseable(ctx: &ValidationContext<'_>) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    let doc = ctx.document;

    let blank = match ctx.preprocessed {
        Some(pre) => pre.is_blank(),
        None => doc.raw_content.trim().is_empty() && doc.front_matter.is_none(),
    };
    if blank {
        out.push(Diagnostic::new(DiagnosticCode::EmptyFile));
    }

    if let Some(pre) = ctx.preprocessed {
        if !pre.encoding.is_utf8() {
            out.push(
                Diagnostic::new(DiagnosticCode::InvalidEncoding)
                    .with_detail(format!("decoded as {}", pre.encoding)),
            );
        }
        if pre.line_endings.has_cr() {
            out.push(
                Diagnostic::new(DiagnosticCode::InvalidLineEndings)
                    .with_context(format!("{:?}", pre.line_endings)),
            );
        }
    }

    for block in doc.code_blocks().filter(|b| !b.closed) {
        out.push(
            Diagnostic::new(DiagnosticCode::InvalidMarkdown)
                .with_line(block.line)
                .with_detail("unclosed code fence"),
        );
    }

    if ctx.classification.is_full_dump() {
        out.push(
            Diagnostic::new(DiagnosticCode::FullDumpDetected)
                .with_context(format!("{} bytes", ctx.classification.byte_size)),
        );
    }
    out
}

fn structural(ctx: &ValidationContext<'_>) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    let doc = ctx.document;

    if doc.title.is_none() {
        out.push(Diagnostic::new(DiagnosticCode::NoH1Title));
    }
    for &line in doc.h1_lines.iter().skip(1) {
        out.push(Diagnostic::new(DiagnosticCode::MultipleH1).with_line(line));
    }

    for link in doc.links().filter(|l| !l.is_well_formed) {
        out.push(
            Diagnostic::new(DiagnosticCode::BrokenLinks)
                .with_line(link.line)
                .with_context(format!("[{}]({})", link.title, link.url)),
        );
    }

    if doc.estimated_tokens > TOKEN_ZONE_DEGRADATION {
        out.push(
            Diagnostic::new(DiagnosticCode::ExceedsSizeLimit)
                .with_detail(format!("~{} tokens", doc.estimated_tokens)),
        );
    }

    if doc.description.is_none() {
        out.push(Diagnostic::new(DiagnosticCode::MissingBlockquote));
    }

    for section in doc.sections.iter().filter(|s| s.canonical.is_none()) {
        out.push(
            Diagnostic::new(DiagnosticCode::NonCanonicalSectionName)
                .with_line(section.line)
                .with_context(section.name.clone()),
        );
    }

    let first = doc.sections.first();
    if first.and_then(|s| s.canonical) != Some(CanonicalSectionName::MasterIndex) {
        let mut d = Diagnostic::new(DiagnosticCode::NoMasterIndex);
        if let Some(section) = first {
            d = d.with_line(section.line).with_context(section.name.clone());
        }
        out.push(d);
    }
    out
}

fn content(ctx: &ValidationContext<'_>) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    let doc = ctx.document;

    for link in doc.links() {
        if !link.has_description() {
            out.push(
                Diagnostic::new(DiagnosticCode::LinkMissingDescription)
                    .with_line(link.line)
                    .with_context(link.title.clone()),
            );
        }
        if link.kind == LinkKind::Relative {
            out.push(
                Diagnostic::new(DiagnosticCode::RelativeUrlsDetected)
                    .with_line(link.line)
                    .with_context(link.url.clone()),
            );
        }
    }

    if doc.code_blocks().next().is_none() {
        out.push(Diagnostic::new(DiagnosticCode::NoCodeExamples));
    }
    for block in doc.code_blocks().filter(|b| b.language.is_none()) {
        out.push(Diagnostic::new(DiagnosticCode::CodeNoLanguage).with_line(block.line));
    }

    if let Some(pattern) = &ctx.signals.formulaic {
        out.push(
            Diagnostic::new(DiagnosticCode::FormulaicDescriptions)
                .with_detail(format!("{} of {} share one template", pattern.matches, pattern.total))
                .with_context(pattern.template.clone()),
        );
    }

    for &index in &ctx.signals.empty_sections {
        if let Some(section) = doc.sections.get(index) {
            out.push(
                Diagnostic::new(DiagnosticCode::EmptySections)
                    .with_line(section.line)
                    .with_context(section.name.clone()),
            );
        }
    }
    out
}

fn best_practices(ctx: &ValidationContext<'_>) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    let doc = ctx.document;

    if !ctx.signals.has_version_metadata {
        out.push(Diagnostic::new(DiagnosticCode::MissingVersionMetadata));
    }

    if let Some(index) = ctx.signals.out_of_order {
        let section = &doc.sections[index];
        let previous = doc.sections[..index]
            .iter()
            .filter_map(|s| s.canonical)
            .max_by_key(|c| c.sort_key());
        let mut d = Diagnostic::new(DiagnosticCode::SectionOrderNonCanonical)
            .with_line(section.line);
        if let Some(previous) = previous {
            d = d.with_context(format!("'{}' appears after '{}'", section.name, previous));
        }
        out.push(d);
    }

    let budget = ctx.enrichment.token_budget();
    if doc.estimated_tokens > budget {
        out.push(
            Diagnostic::new(DiagnosticCode::TokenBudgetExceeded)
                .with_detail(format!("~{} tokens, budget {}", doc.estimated_tokens, budget)),
        );
    }
    out
}

fn extended(ctx: &ValidationContext<'_>) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    let doc = ctx.document;
    let enrichment = ctx.enrichment;

    if !doc.has_section(CanonicalSectionName::LlmInstructions) && enrichment.instructions.is_empty() {
        out.push(Diagnostic::new(DiagnosticCode::NoLlmInstructions));
    }
    if enrichment.concepts.is_empty() {
        out.push(Diagnostic::new(DiagnosticCode::NoConceptDefinitions));
    }
    if enrichment.few_shot_examples.is_empty() {
        out.push(Diagnostic::new(DiagnosticCode::NoFewShotExamples));
    }

    for section in &doc.sections {
        if section.canonical == Some(CanonicalSectionName::Optional)
            && !has_token_annotation(&section.name)
        {
            out.push(
                Diagnostic::new(DiagnosticCode::OptionalSectionsUnmarked)
                    .with_line(section.line)
                    .with_context(section.name.clone()),
            );
        }
    }

    let undefined = ctx.signals.acronyms.undefined();
    if !undefined.is_empty() {
        out.push(
            Diagnostic::new(DiagnosticCode::JargonWithoutDefinition)
                .with_detail(format!("{} undefined", undefined.len()))
                .with_context(undefined.join(", ")),
        );
    }
    out
}

/// `"Optional (~800 tokens)"`: a tilde, a number, then the word tokens.
fn has_token_annotation(name: &str) -> bool {
    let Some(tilde) = name.find('~') else {
        return false;
    };
    let rest = &name[tilde + 1..];
    let digits = rest
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .count();
    digits > 0 && rest[digits..].to_lowercase().trim_start().starts_with(['k', 't'])
        && rest.to_lowercase().contains("token")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_annotation() {
        assert!(has_token_annotation("Optional (~800 tokens)"));
        assert!(has_token_annotation("Optional (~1,200 tokens)"));
        assert!(has_token_annotation("Optional (~2k tokens)"));
        assert!(!has_token_annotation("Optional"));
        assert!(!has_token_annotation("Optional (~ tokens)"));
        assert!(!has_token_annotation("Optional (~800)"));
    }
}
