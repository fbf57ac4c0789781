//! # Taxonomy
//!
//! Keyword taxonomy the categorizer scores against, plus the importance
//! criteria table attached to scored items.
//!
//! - Loads from TOML or JSON (category order is file order).
//! - Lookup path: `$DIGEST_TAXONOMY_PATH` → `config/taxonomy.toml` →
//!   `config/taxonomy.json` → built-in `default_seed()`.
//! - Validation rejects empty taxonomies, duplicate ids and a default
//!   category that is not one of the categories.
//!
//! The taxonomy is an injected, immutable value: every engine entry point
//! takes `&Taxonomy`, nothing reads a process-wide copy.

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::types::Level;

pub const ENV_TAXONOMY_PATH: &str = "DIGEST_TAXONOMY_PATH";
pub const DEFAULT_TAXONOMY_TOML: &str = "config/taxonomy.toml";
pub const DEFAULT_TAXONOMY_JSON: &str = "config/taxonomy.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    /// Case-insensitive substring keywords, in configured order.
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl Category {
    pub fn new(id: &str, display_name: &str, description: &str, keywords: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            description: description.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportanceCriterion {
    pub score: u8,
    pub description: String,
    #[serde(default)]
    pub indicators: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportanceCriteria {
    pub high: ImportanceCriterion,
    pub medium: ImportanceCriterion,
    pub low: ImportanceCriterion,
}

impl ImportanceCriteria {
    pub fn get(&self, level: Level) -> &ImportanceCriterion {
        match level {
            Level::High => &self.high,
            Level::Medium => &self.medium,
            Level::Low => &self.low,
        }
    }
}

impl Default for ImportanceCriteria {
    fn default() -> Self {
        fn crit(score: u8, description: &str, indicators: &[&str]) -> ImportanceCriterion {
            ImportanceCriterion {
                score,
                description: description.to_string(),
                indicators: indicators.iter().map(|s| s.to_string()).collect(),
            }
        }
        Self {
            high: crit(
                3,
                "Must-know for generative AI practitioners",
                &[
                    "generative AI breakthrough",
                    "major announcement from a leading lab",
                    "significant academic result",
                    "new generative model release",
                    "major large language model update",
                ],
            ),
            medium: crit(
                2,
                "Good to know for generative AI practitioners",
                &[
                    "incremental generative AI progress",
                    "new generative AI tool or service",
                    "market movement in code/content generation",
                    "generative AI funding",
                    "applied case studies",
                    "ethics and safety discussion",
                ],
            ),
            low: crit(
                1,
                "For reference",
                &[
                    "general AI news",
                    "minor update",
                    "entertainment uses of AI",
                ],
            ),
        }
    }
}

/// Ordered category list, fallback category and importance table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Taxonomy {
    pub categories: Vec<Category>,
    /// Category absorbing items with zero keyword overlap.
    pub default_category: String,
    #[serde(default)]
    pub importance: ImportanceCriteria,
}

impl Taxonomy {
    /// Build and validate.
    pub fn new(categories: Vec<Category>, default_category: impl Into<String>) -> Result<Self> {
        let tx = Self {
            categories,
            default_category: default_category.into(),
            importance: ImportanceCriteria::default(),
        };
        tx.validate()?;
        Ok(tx)
    }

    pub fn validate(&self) -> Result<()> {
        if self.categories.is_empty() {
            bail!("taxonomy has no categories");
        }
        let mut seen = HashSet::new();
        for c in &self.categories {
            if c.id.trim().is_empty() {
                bail!("taxonomy category with empty id");
            }
            if !seen.insert(c.id.as_str()) {
                bail!("duplicate taxonomy category id `{}`", c.id);
            }
        }
        if !seen.contains(self.default_category.as_str()) {
            bail!(
                "default category `{}` is not a taxonomy category",
                self.default_category
            );
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// The default category, or the first one when `default_category` is
    /// not present. `None` only for an unvalidated, empty taxonomy.
    pub fn fallback(&self) -> Option<&Category> {
        self.get(&self.default_category)
            .or_else(|| self.categories.first())
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.id.as_str())
    }

    /// Load from an explicit path. TOML or JSON, chosen by extension with content sniffing fallback.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading taxonomy from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let tx = parse_taxonomy(&content, &ext)
            .with_context(|| format!("parsing taxonomy {}", path.display()))?;
        tx.validate()
            .with_context(|| format!("validating taxonomy {}", path.display()))?;
        Ok(tx)
    }

    /// Env var + fallbacks, then the built-in seed.
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_TAXONOMY_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
            return Err(anyhow!("{ENV_TAXONOMY_PATH} points to non-existent path"));
        }
        for candidate in [DEFAULT_TAXONOMY_TOML, DEFAULT_TAXONOMY_JSON] {
            let pb = PathBuf::from(candidate);
            if pb.exists() {
                return Self::load_from(&pb);
            }
        }
        Ok(Self::default_seed())
    }

    /// Built-in generative-AI taxonomy.
    pub fn default_seed() -> Self {
        let categories = vec![
            Category::new(
                "breakthrough",
                "AI Breakthroughs",
                "Novel AI techniques, research results and new methods",
                &[
                    "breakthrough", "research", "paper", "arxiv", "new model",
                    "algorithm", "neural network", "transformer", "diffusion",
                    "language model", "multimodal", "AGI", "artificial general intelligence",
                    "GPT", "LLM", "foundation model", "vision transformer",
                ],
            ),
            Category::new(
                "llm_chatbot",
                "Major LLM Updates",
                "Language models and chatbots such as ChatGPT, Claude and Gemini",
                &[
                    "ChatGPT", "GPT-4", "Claude", "Gemini", "Bard",
                    "language model", "LLM", "chatbot", "conversational AI",
                    "OpenAI", "Anthropic", "Google AI", "dialogue system",
                    "prompt engineering", "in-context learning",
                ],
            ),
            Category::new(
                "design_ai",
                "Design & UI/UX AI",
                "UI/UX design assistance, prototyping and design systems for engineers",
                &[
                    "Figma AI", "Framer", "v0", "Galileo AI", "Uizard",
                    "UI generation", "UX design", "prototype", "wireframe",
                    "design system", "component library", "design tokens",
                    "responsive design", "mobile design", "web design",
                    "user interface", "user experience", "accessibility",
                    "design automation", "layout generation", "color palette",
                    "typography", "icon generation", "design handoff",
                    "React components", "Vue components", "CSS generation",
                    "Tailwind CSS", "styled-components", "design to code",
                ],
            ),
            Category::new(
                "generative_ai",
                "Image & Video Generation",
                "Image, video and music generation, creative AI tools",
                &[
                    "DALL-E", "Midjourney", "Stable Diffusion", "Sora", "Runway",
                    "image generation", "video generation", "music generation",
                    "text-to-image", "text-to-video", "creative AI", "art AI",
                    "generative model", "diffusion model", "GAN",
                    "image synthesis", "video synthesis", "audio synthesis",
                    "multimodal generation", "content creation", "creative tools",
                ],
            ),
            Category::new(
                "programming_tools",
                "Programming Tools & Dev Environments",
                "Developer tools, IDEs, frameworks and library updates",
                &[
                    "GitHub Copilot", "Cursor", "Claude Code", "Codeium", "Tabnine",
                    "VS Code", "JetBrains", "Replit", "CodeSandbox", "Vercel",
                    "Next.js", "React", "Vue", "Angular", "Node.js", "Python",
                    "Docker", "Kubernetes", "Git", "GitHub", "GitLab",
                    "pricing", "subscription", "free tier", "enterprise",
                    "version update", "new features", "beta", "stable release",
                    "IDE extension", "plugin", "developer experience", "DX",
                    "code completion", "AI assistant", "pair programming",
                    "debugging tools", "testing framework", "CI/CD",
                ],
            ),
            Category::new(
                "ai_coding",
                "AI Coding Assistance",
                "AI-powered code generation, programming assistance and automation",
                &[
                    "code generation", "AI coding", "programming assistant",
                    "automated coding", "code review", "refactoring",
                    "unit test generation", "documentation generation",
                    "code explanation", "code completion", "intelligent search",
                    "bug detection", "security scanning", "performance optimization",
                ],
            ),
            Category::new(
                "business_enterprise",
                "Business & Enterprise AI",
                "Enterprise adoption, workflow automation and AI agents",
                &[
                    "enterprise AI", "business AI", "automation", "AI agent",
                    "workflow", "productivity", "Microsoft Copilot", "ChatGPT Enterprise",
                    "AI assistant", "customer service", "analytics", "insights",
                ],
            ),
            Category::new(
                "hardware_chip",
                "AI Hardware & Chips",
                "GPUs, TPUs, dedicated AI silicon and edge AI",
                &[
                    "GPU", "TPU", "AI chip", "NVIDIA", "hardware", "edge AI",
                    "inference", "training", "compute", "semiconductor",
                    "accelerator", "neural processing unit", "NPU",
                ],
            ),
            Category::new(
                "regulation_ethics",
                "Regulation, Ethics & Safety",
                "AI regulation, ethics, safety and bias mitigation",
                &[
                    "AI regulation", "ethics", "bias", "fairness", "safety",
                    "responsible AI", "AI governance", "policy", "law",
                    "privacy", "security", "alignment", "AI safety",
                ],
            ),
            Category::new(
                "ai_trends",
                "Industry Trends",
                "Industry-wide movements, market analysis, forecasts and reports",
                &[
                    "AI market", "industry trend", "market analysis", "forecast",
                    "adoption rate", "AI transformation", "enterprise adoption",
                    "AI investment", "market size", "growth prediction",
                    "AI strategy", "competitive landscape", "industry report",
                    "technology roadmap", "emerging trends", "AI maturity",
                    "industry survey", "benchmark", "AI readiness",
                ],
            ),
            Category::new(
                "startups_funding",
                "Startups & Funding",
                "Investment, fundraising and new AI companies",
                &[
                    "funding", "investment", "startup", "venture capital",
                    "IPO", "acquisition", "merger", "valuation",
                    "AI company", "unicorn", "series A", "series B",
                ],
            ),
        ];

        Self {
            categories,
            default_category: "llm_chatbot".to_string(),
            importance: ImportanceCriteria::default(),
        }
    }
}

fn parse_taxonomy(s: &str, hint_ext: &str) -> Result<Taxonomy> {
    match hint_ext {
        "toml" => Ok(toml::from_str(s)?),
        "json" => Ok(serde_json::from_str(s)?),
        _ => {
            if let Ok(tx) = serde_json::from_str::<Taxonomy>(s) {
                return Ok(tx);
            }
            toml::from_str(s).map_err(|e| anyhow!("unsupported taxonomy format: {e}"))
        }
    }
}
