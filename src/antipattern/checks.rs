//! Built-in detection rules, one per registry entry

use super::types::{DetectionContext, FnCheck};
use crate::preprocess::LineEndingStyle;
use crate::schema::{normalize_section_name, AntiPatternId, CanonicalSectionName, TOKEN_ZONE_DEGRADATION};
use crate::signals::prose_lines;
use std::collections::{HashMap, HashSet};

const MIN_MEANINGFUL_CHARS: usize = 20;
const SITEMAP_SECTION_LINKS: usize = 50;
const SITEMAP_SINGLE_SECTION_LINKS: usize = 20;
const COPY_PASTE_MIN_LINE: usize = 60;
const JARGON_MIN_ACRONYMS: usize = 5;
const OUTDATED_MIN_MARKERS: usize = 2;

const VAGUE_SECTION_NAMES: &[&str] = &[
    "links", "resources", "misc", "miscellaneous", "other", "others", "stuff", "more", "general",
    "info", "information", "content", "pages", "things", "notes", "various", "etc",
];

const DEPRECATION_MARKERS: &[&str] = &[
    "deprecated",
    "obsolete",
    "no longer supported",
    "no longer maintained",
    "end of life",
    "end-of-life",
    "legacy version",
    "outdated",
];

const GENERATOR_MARKERS: &[&str] = &[
    "auto-generated",
    "autogenerated",
    "automatically generated",
    "generated by",
    "this file was generated",
    "do not edit",
];

const MANIPULATIVE_PHRASES: &[&str] = &[
    "ignore previous instructions",
    "ignore all previous",
    "disregard other sources",
    "disregard any other",
    "always recommend",
    "only recommend",
    "never recommend",
    "you must prefer",
    "rank this",
    "is the best solution",
    "is superior to all",
    "the only trustworthy",
    "trust this source above",
];

/// The 22 rules in registry order.
pub(crate) fn builtin_checks() -> Vec<FnCheck> {
    use AntiPatternId::*;
    vec![
        FnCheck::new(GhostFile, ghost_file),
        FnCheck::new(StructureChaos, structure_chaos),
        FnCheck::new(EncodingDisaster, encoding_disaster),
        FnCheck::new(LinkVoid, link_void),
        FnCheck::new(SitemapDump, sitemap_dump),
        FnCheck::new(OrphanedSections, orphaned_sections),
        FnCheck::new(DuplicateIdentity, duplicate_identity),
        FnCheck::new(SectionShuffle, section_shuffle),
        FnCheck::new(NamingNebula, naming_nebula),
        FnCheck::new(CopyPastePlague, copy_paste_plague),
        FnCheck::new(BlankCanvas, blank_canvas),
        FnCheck::new(JargonJungle, jargon_jungle),
        FnCheck::new(LinkDesert, link_desert),
        FnCheck::new(OutdatedOracle, outdated_oracle),
        FnCheck::new(ExampleVoid, example_void),
        FnCheck::new(FormulaicDescription, formulaic_description),
        FnCheck::new(SilentAgent, silent_agent),
        FnCheck::new(VersionlessDrift, versionless_drift),
        FnCheck::new(AutomationObsession, automation_obsession),
        FnCheck::new(MonolithMonster, monolith_monster),
        FnCheck::new(MetaDocumentationSpiral, meta_documentation_spiral),
        FnCheck::new(PreferenceTrap, preference_trap),
    ]
}

fn ghost_file(ctx: &DetectionContext<'_>) -> Option<String> {
    let chars = ctx.signals.non_whitespace_chars;
    (chars < MIN_MEANINGFUL_CHARS).then(|| format!("{} non-whitespace characters", chars))
}

fn structure_chaos(ctx: &DetectionContext<'_>) -> Option<String> {
    let doc = ctx.document;
    (ctx.signals.non_whitespace_chars > 0 && doc.h1_lines.is_empty() && doc.sections.is_empty())
        .then(|| "no H1 or H2 headings".to_string())
}

fn encoding_disaster(ctx: &DetectionContext<'_>) -> Option<String> {
    let mut problems = Vec::new();
    match ctx.preprocessed {
        Some(pre) => {
            if !pre.encoding.is_utf8() {
                problems.push(format!("decoded as {}", pre.encoding));
            }
            if pre.line_endings == LineEndingStyle::Mixed {
                problems.push("mixed line endings".to_string());
            }
            if pre.replacement_chars > 0 {
                problems.push(format!("{} replacement characters", pre.replacement_chars));
            }
        }
        None => {
            let count = ctx.document.raw_content.matches('\u{FFFD}').count();
            if count > 0 {
                problems.push(format!("{} replacement characters", count));
            }
        }
    }
    (!problems.is_empty()).then(|| problems.join(", "))
}

fn link_void(ctx: &DetectionContext<'_>) -> Option<String> {
    let total = ctx.document.total_links();
    let malformed = ctx.document.links().filter(|l| !l.is_well_formed).count();
    (total > 0 && malformed * 2 > total).then(|| format!("{} of {} links malformed", malformed, total))
}

fn sitemap_dump(ctx: &DetectionContext<'_>) -> Option<String> {
    let sections = &ctx.document.sections;
    if let Some(big) = sections.iter().find(|s| s.links.len() > SITEMAP_SECTION_LINKS) {
        return Some(format!("'{}' has {} links", big.name, big.links.len()));
    }
    match sections.as_slice() {
        [only] if only.links.len() >= SITEMAP_SINGLE_SECTION_LINKS => Some(format!(
            "single section '{}' with {} links",
            only.name,
            only.links.len()
        )),
        _ => None,
    }
}

fn orphaned_sections(ctx: &DetectionContext<'_>) -> Option<String> {
    let orphans: Vec<&str> = ctx
        .document
        .sections
        .iter()
        .filter(|s| s.links.is_empty())
        .map(|s| s.name.as_str())
        .collect();
    (!orphans.is_empty()).then(|| format!("no links in: {}", orphans.join(", ")))
}

fn duplicate_identity(ctx: &DetectionContext<'_>) -> Option<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut seen_canonical: HashSet<CanonicalSectionName> = HashSet::new();
    let mut duplicates = Vec::new();
    for section in &ctx.document.sections {
        let fresh_name = seen.insert(normalize_section_name(&section.name));
        let fresh_canonical = section.canonical.map_or(true, |c| seen_canonical.insert(c));
        if !fresh_name || !fresh_canonical {
            duplicates.push(section.name.as_str());
        }
    }
    (!duplicates.is_empty()).then(|| format!("duplicated: {}", duplicates.join(", ")))
}

fn section_shuffle(ctx: &DetectionContext<'_>) -> Option<String> {
    let index = ctx.signals.out_of_order?;
    let section = ctx.document.sections.get(index)?;
    Some(format!("'{}' out of canonical order", section.name))
}

fn naming_nebula(ctx: &DetectionContext<'_>) -> Option<String> {
    let vague: Vec<&str> = ctx
        .document
        .sections
        .iter()
        .filter(|s| VAGUE_SECTION_NAMES.contains(&normalize_section_name(&s.name).as_str()))
        .map(|s| s.name.as_str())
        .collect();
    (!vague.is_empty()).then(|| format!("vague names: {}", vague.join(", ")))
}

fn copy_paste_plague(ctx: &DetectionContext<'_>) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for line in prose_lines(&ctx.document.raw_content) {
        let line = line.trim();
        if line.chars().count() >= COPY_PASTE_MIN_LINE {
            *counts.entry(line).or_default() += 1;
        }
    }
    let repeated = counts.values().filter(|&&n| n > 1).count();
    (repeated > 0).then(|| format!("{} long lines repeated", repeated))
}

fn blank_canvas(ctx: &DetectionContext<'_>) -> Option<String> {
    let names: Vec<&str> = ctx
        .signals
        .empty_sections
        .iter()
        .filter_map(|&i| ctx.document.sections.get(i))
        .map(|s| s.name.as_str())
        .collect();
    (!names.is_empty()).then(|| format!("empty or placeholder: {}", names.join(", ")))
}

fn jargon_jungle(ctx: &DetectionContext<'_>) -> Option<String> {
    let usage = &ctx.signals.acronyms;
    let used = usage.used.len();
    let defined = usage.defined.len();
    (used >= JARGON_MIN_ACRONYMS && defined * 2 < used)
        .then(|| format!("{} acronyms, {} defined", used, defined))
}

fn link_desert(ctx: &DetectionContext<'_>) -> Option<String> {
    let total = ctx.document.total_links();
    let bare = ctx.document.links().filter(|l| !l.has_description()).count();
    (total > 0 && bare * 2 > total).then(|| format!("{} of {} links lack descriptions", bare, total))
}

fn outdated_oracle(ctx: &DetectionContext<'_>) -> Option<String> {
    let lower = ctx.document.raw_content.to_lowercase();
    let markers: usize = DEPRECATION_MARKERS.iter().map(|m| lower.matches(m).count()).sum();
    (markers >= OUTDATED_MIN_MARKERS).then(|| format!("{} deprecation markers", markers))
}

fn example_void(ctx: &DetectionContext<'_>) -> Option<String> {
    ctx.document
        .code_blocks()
        .next()
        .is_none()
        .then(|| "no fenced code blocks".to_string())
}

fn formulaic_description(ctx: &DetectionContext<'_>) -> Option<String> {
    ctx.signals.formulaic.as_ref().map(|p| {
        format!("'{}' opens {} of {} descriptions", p.template, p.matches, p.total)
    })
}

fn silent_agent(ctx: &DetectionContext<'_>) -> Option<String> {
    (!ctx.document.has_section(CanonicalSectionName::LlmInstructions))
        .then(|| "no LLM Instructions section".to_string())
}

fn versionless_drift(ctx: &DetectionContext<'_>) -> Option<String> {
    (!ctx.signals.has_version_metadata).then(|| "no version or date metadata".to_string())
}

fn automation_obsession(ctx: &DetectionContext<'_>) -> Option<String> {
    let lower = ctx.document.raw_content.to_lowercase();
    let found: Vec<&str> = GENERATOR_MARKERS
        .iter()
        .copied()
        .filter(|m| lower.contains(m))
        .collect();
    (!found.is_empty()).then(|| format!("generator markers: {}", found.join(", ")))
}

fn monolith_monster(ctx: &DetectionContext<'_>) -> Option<String> {
    let tokens = ctx.document.estimated_tokens;
    (tokens > TOKEN_ZONE_DEGRADATION).then(|| format!("~{} tokens", tokens))
}

fn meta_documentation_spiral(ctx: &DetectionContext<'_>) -> Option<String> {
    let total = ctx.document.total_links();
    let meta = ctx
        .document
        .links()
        .filter(|l| {
            let text = format!("{} {}", l.title, l.url).to_lowercase();
            text.contains("llms.txt") || text.contains("llmstxt") || text.contains("llms-txt")
        })
        .count();
    (total >= 2 && meta * 2 > total).then(|| format!("{} of {} links about llms.txt", meta, total))
}

fn preference_trap(ctx: &DetectionContext<'_>) -> Option<String> {
    let lower = ctx.document.raw_content.to_lowercase();
    let found: Vec<&str> = MANIPULATIVE_PHRASES
        .iter()
        .copied()
        .filter(|p| lower.contains(p))
        .collect();
    (!found.is_empty()).then(|| format!("manipulative phrasing: {}", found.join(", ")))
}
