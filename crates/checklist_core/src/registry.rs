use crate::check::{CheckDescriptor, PriorityTier};
use crate::checks::{
    AccessibilityCheck, BundleSizeCheck, DependencyAuditCheck, EnvironmentCheck, LighthouseCheck,
    SecretsCheck, ToolCheck,
};
use crate::config::ChecklistConfig;
use crate::error::{ChecklistError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckId {
    Secrets,
    Dependencies,
    Environment,
    Lint,
    TypeScript,
    Tests,
    BundleSize,
    Accessibility,
    Lighthouse,
    Playwright,
}

/// Quick checklist, in execution order.
pub const QUICK_CHECKS: &[CheckId] = &[
    CheckId::Secrets,
    CheckId::Dependencies,
    CheckId::Environment,
    CheckId::Lint,
    CheckId::TypeScript,
    CheckId::Tests,
];

/// Full verification, in execution order.
pub const FULL_CHECKS: &[CheckId] = &[
    CheckId::Secrets,
    CheckId::Dependencies,
    CheckId::Lint,
    CheckId::TypeScript,
    CheckId::Tests,
    CheckId::BundleSize,
    CheckId::Accessibility,
    CheckId::Lighthouse,
    CheckId::Playwright,
];

impl CheckId {
    pub fn name(self) -> &'static str {
        match self {
            CheckId::Secrets => "Security: Secrets",
            CheckId::Dependencies => "Security: Dependencies",
            CheckId::Environment => "Security: Environment",
            CheckId::Lint => "Quality: Lint",
            CheckId::TypeScript => "Quality: TypeScript",
            CheckId::Tests => "Quality: Tests",
            CheckId::BundleSize => "Bundle: Size",
            CheckId::Accessibility => "Accessibility",
            CheckId::Lighthouse => "Lighthouse",
            CheckId::Playwright => "Playwright E2E",
        }
    }

    pub fn tier(self) -> PriorityTier {
        match self {
            CheckId::Secrets | CheckId::Dependencies | CheckId::Environment => {
                PriorityTier::Security
            }
            CheckId::Lint | CheckId::TypeScript | CheckId::Tests => PriorityTier::Quality,
            CheckId::BundleSize | CheckId::Accessibility => PriorityTier::Extended,
            CheckId::Lighthouse | CheckId::Playwright => PriorityTier::Network,
        }
    }

    fn descriptor(self, cfg: &ChecklistConfig) -> Result<CheckDescriptor> {
        let (name, tier) = (self.name(), self.tier());
        let descriptor = match self {
            CheckId::Secrets => CheckDescriptor::new(name, tier, SecretsCheck::from_config(&cfg.secrets)?),
            CheckId::Dependencies => {
                CheckDescriptor::new(name, tier, DependencyAuditCheck::from_config(&cfg.audit))
            }
            CheckId::Environment => CheckDescriptor::new(name, tier, EnvironmentCheck),
            CheckId::Lint => CheckDescriptor::new(name, tier, ToolCheck::lint()),
            CheckId::TypeScript => CheckDescriptor::new(name, tier, ToolCheck::typescript()),
            CheckId::Tests => CheckDescriptor::new(name, tier, ToolCheck::tests()),
            CheckId::BundleSize => CheckDescriptor::new(name, tier, BundleSizeCheck),
            CheckId::Accessibility => CheckDescriptor::new(
                name,
                tier,
                AccessibilityCheck::new(cfg.secrets.exclude_dirs()),
            ),
            CheckId::Lighthouse => {
                CheckDescriptor::new(name, tier, LighthouseCheck::from_config(&cfg.lighthouse))
            }
            CheckId::Playwright => CheckDescriptor::new(name, tier, ToolCheck::playwright()),
        };
        Ok(descriptor)
    }
}

/// Ordered list of checks. Declaration order is execution order.
#[derive(Debug, Default)]
pub struct Registry {
    descriptors: Vec<CheckDescriptor>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, descriptor: CheckDescriptor) -> Result<()> {
        if self.descriptors.iter().any(|d| d.name == descriptor.name) {
            return Err(ChecklistError::DuplicateCheck(descriptor.name));
        }
        self.descriptors.push(descriptor);
        Ok(())
    }

    /// Builds the listed checks, leaving out any the config switches off.
    pub fn from_ids(ids: &[CheckId], cfg: &ChecklistConfig) -> Result<Self> {
        let mut registry = Self::new();
        for &id in ids.iter().filter(|&&id| cfg.checks.enabled(id)) {
            registry.register(id.descriptor(cfg)?)?;
        }
        Ok(registry)
    }

    pub fn quick(cfg: &ChecklistConfig) -> Result<Self> {
        Self::from_ids(QUICK_CHECKS, cfg)
    }

    pub fn full(cfg: &ChecklistConfig) -> Result<Self> {
        Self::from_ids(FULL_CHECKS, cfg)
    }

    pub fn descriptors(&self) -> &[CheckDescriptor] {
        &self.descriptors
    }

    pub fn names(&self) -> Vec<&str> {
        self.descriptors.iter().map(|d| d.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
