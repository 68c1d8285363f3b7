//! Heuristic lookup tables used by the scorers, detectors and synthesizer.
//!
//! These are data, not logic: extending a table changes which paths match but
//! never the number of points a matched condition is worth.

use crate::types::TechCategory;

/// Top-level directory names that indicate a deliberate project layout
pub const RECOGNIZED_DIRECTORIES: &[&str] = &[
    "src",
    "lib",
    "utils",
    "components",
    "services",
    "models",
    "controllers",
    "middleware",
    "config",
    "tests",
    "docs",
    "scripts",
    "public",
    "assets",
];

/// Dependency lock files, matched against file names anywhere in the tree
pub const LOCK_FILES: &[&str] = &[
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "bun.lockb",
    "bun.lock",
    "cargo.lock",
    "poetry.lock",
    "uv.lock",
    "pdm.lock",
    "pipfile.lock",
    "gemfile.lock",
    "composer.lock",
    "go.sum",
    "mix.lock",
    "podfile.lock",
    "packages.lock.json",
    "gradle.lockfile",
];

/// Root-level manifests and the lock files that should accompany them
pub const MANIFEST_LOCKS: &[(&str, &[&str])] = &[
    (
        "package.json",
        &["package-lock.json", "yarn.lock", "pnpm-lock.yaml", "bun.lockb", "bun.lock"],
    ),
    ("cargo.toml", &["cargo.lock"]),
    ("pyproject.toml", &["poetry.lock", "uv.lock", "pdm.lock"]),
    ("pipfile", &["pipfile.lock"]),
    ("gemfile", &["gemfile.lock"]),
    ("composer.json", &["composer.lock"]),
    ("go.mod", &["go.sum"]),
    ("mix.exs", &["mix.lock"]),
];

/// Build manifests that mark a project as packaged
pub const MANIFEST_FILES: &[&str] = &[
    "package.json",
    "setup.py",
    "setup.cfg",
    "pyproject.toml",
    "cargo.toml",
    "go.mod",
    "pom.xml",
    "build.gradle",
    "build.gradle.kts",
    "gemfile",
    "composer.json",
    "mix.exs",
    "pubspec.yaml",
];

/// Substrings of file names that identify linter or formatter configuration
pub const LINT_CONFIG_PATTERNS: &[&str] = &[
    ".eslintrc",
    "eslint.config",
    ".prettierrc",
    "prettier.config",
    "biome.json",
    "tslint.json",
    ".stylelintrc",
    "pylintrc",
    ".flake8",
    "ruff.toml",
    ".ruff.toml",
    "rustfmt.toml",
    "clippy.toml",
    ".golangci",
    ".rubocop.yml",
    ".editorconfig",
    "phpcs.xml",
    "checkstyle.xml",
];

/// Path suffixes that indicate static typing (TypeScript or Python hints)
pub const TYPED_SUFFIXES: &[&str] = &[
    ".ts",
    ".tsx",
    ".pyi",
    "py.typed",
    "tsconfig.json",
    "mypy.ini",
];

/// File names of security policies
pub const SECURITY_POLICY_FILES: &[&str] = &["security.md", "security.txt", "security.rst"];

/// Suffixes that mark an `.env*` file as a template rather than real secrets
pub const ENV_TEMPLATE_SUFFIXES: &[&str] = &[".example", ".sample", ".template", ".dist", ".defaults"];

/// Path substrings suggesting error-handling conventions
pub const ERROR_HANDLING_PATTERNS: &[&str] = &["error", "exception", "middleware"];

/// Path substrings suggesting logging or monitoring conventions
pub const LOGGING_PATTERNS: &[&str] = &[
    "logger",
    "logging",
    "monitor",
    "sentry",
    "telemetry",
    "observability",
    "metrics",
];

/// File path signatures (lowercase substring) mapped to technologies
pub const FILE_SIGNATURES: &[(&str, &str, TechCategory)] = &[
    ("next.config", "Next.js", TechCategory::Framework),
    ("nuxt.config", "Nuxt", TechCategory::Framework),
    ("angular.json", "Angular", TechCategory::Framework),
    ("svelte.config", "Svelte", TechCategory::Framework),
    ("gatsby-config", "Gatsby", TechCategory::Framework),
    ("remix.config", "Remix", TechCategory::Framework),
    ("astro.config", "Astro", TechCategory::Framework),
    ("tailwind.config", "Tailwind CSS", TechCategory::Framework),
    ("manage.py", "Django", TechCategory::Framework),
    ("artisan", "Laravel", TechCategory::Framework),
    ("config/routes.rb", "Ruby on Rails", TechCategory::Framework),
    ("pubspec.yaml", "Flutter", TechCategory::Framework),
    ("vite.config", "Vite", TechCategory::Tool),
    ("webpack.config", "Webpack", TechCategory::Tool),
    ("package.json", "npm", TechCategory::Tool),
    ("tsconfig.json", "TypeScript", TechCategory::Language),
    ("requirements.txt", "pip", TechCategory::Tool),
    ("pyproject.toml", "Python Packaging", TechCategory::Tool),
    ("cargo.toml", "Cargo", TechCategory::Tool),
    ("go.mod", "Go Modules", TechCategory::Tool),
    ("pom.xml", "Maven", TechCategory::Tool),
    ("build.gradle", "Gradle", TechCategory::Tool),
    ("gemfile", "Bundler", TechCategory::Tool),
    ("dockerfile", "Docker", TechCategory::Tool),
    ("docker-compose", "Docker Compose", TechCategory::Tool),
    ("makefile", "Make", TechCategory::Tool),
    ("schema.prisma", "Prisma", TechCategory::Database),
    ("knexfile", "Knex", TechCategory::Database),
    ("alembic.ini", "Alembic", TechCategory::Database),
    ("supabase/", "Supabase", TechCategory::Database),
    ("vercel.json", "Vercel", TechCategory::Cloud),
    ("netlify.toml", "Netlify", TechCategory::Cloud),
    ("firebase.json", "Firebase", TechCategory::Cloud),
    ("serverless.yml", "Serverless Framework", TechCategory::Cloud),
    (".tf", "Terraform", TechCategory::Cloud),
    ("k8s/", "Kubernetes", TechCategory::Cloud),
    ("helm/", "Helm", TechCategory::Cloud),
    ("jest.config", "Jest", TechCategory::Testing),
    ("vitest.config", "Vitest", TechCategory::Testing),
    ("pytest.ini", "pytest", TechCategory::Testing),
    ("conftest.py", "pytest", TechCategory::Testing),
    ("cypress", "Cypress", TechCategory::Testing),
    ("playwright.config", "Playwright", TechCategory::Testing),
    (".github/workflows", "GitHub Actions", TechCategory::CiCd),
    (".gitlab-ci.yml", "GitLab CI", TechCategory::CiCd),
    (".circleci", "CircleCI", TechCategory::CiCd),
    ("jenkinsfile", "Jenkins", TechCategory::CiCd),
    (".travis.yml", "Travis CI", TechCategory::CiCd),
    ("azure-pipelines", "Azure Pipelines", TechCategory::CiCd),
];

/// README keywords (lowercase substring) mapped to technologies
pub const README_KEYWORDS: &[(&str, &str, TechCategory)] = &[
    ("react", "React", TechCategory::Framework),
    ("vue", "Vue.js", TechCategory::Framework),
    ("angular", "Angular", TechCategory::Framework),
    ("svelte", "Svelte", TechCategory::Framework),
    ("express", "Express", TechCategory::Framework),
    ("nestjs", "NestJS", TechCategory::Framework),
    ("django", "Django", TechCategory::Framework),
    ("flask", "Flask", TechCategory::Framework),
    ("fastapi", "FastAPI", TechCategory::Framework),
    ("spring boot", "Spring Boot", TechCategory::Framework),
    ("rails", "Ruby on Rails", TechCategory::Framework),
    ("laravel", "Laravel", TechCategory::Framework),
    ("tensorflow", "TensorFlow", TechCategory::Framework),
    ("pytorch", "PyTorch", TechCategory::Framework),
    ("tokio", "Tokio", TechCategory::Framework),
    ("postgresql", "PostgreSQL", TechCategory::Database),
    ("mysql", "MySQL", TechCategory::Database),
    ("mongodb", "MongoDB", TechCategory::Database),
    ("redis", "Redis", TechCategory::Database),
    ("sqlite", "SQLite", TechCategory::Database),
    ("graphql", "GraphQL", TechCategory::Tool),
    ("docker", "Docker", TechCategory::Tool),
    ("kubernetes", "Kubernetes", TechCategory::Cloud),
    ("aws", "AWS", TechCategory::Cloud),
    ("azure", "Azure", TechCategory::Cloud),
    ("google cloud", "Google Cloud", TechCategory::Cloud),
    ("heroku", "Heroku", TechCategory::Cloud),
    ("jest", "Jest", TechCategory::Testing),
    ("pytest", "pytest", TechCategory::Testing),
    ("github actions", "GitHub Actions", TechCategory::CiCd),
];

/// Test framework recommendation per primary language
pub const TEST_FRAMEWORKS: &[(&str, &str)] = &[
    ("javascript", "Jest"),
    ("typescript", "Vitest or Jest"),
    ("python", "pytest"),
    ("rust", "cargo test with #[test] modules"),
    ("go", "the built-in testing package"),
    ("java", "JUnit 5"),
    ("kotlin", "JUnit 5 or Kotest"),
    ("ruby", "RSpec"),
    ("php", "PHPUnit"),
    ("c#", "xUnit"),
    ("swift", "XCTest"),
    ("c++", "GoogleTest"),
    ("c", "Unity or CMocka"),
    ("dart", "the test package"),
    ("elixir", "ExUnit"),
    ("scala", "ScalaTest"),
];

/// Fallback when the primary language has no entry in [`TEST_FRAMEWORKS`]
pub const DEFAULT_TEST_FRAMEWORK: &str = "a test framework suited to your stack";

/// Recommended test framework for a language, case-insensitive
pub fn test_framework_for(language: Option<&str>) -> &'static str {
    let Some(language) = language else {
        return DEFAULT_TEST_FRAMEWORK;
    };
    let language = language.to_lowercase();
    TEST_FRAMEWORKS
        .iter()
        .find(|(lang, _)| *lang == language)
        .map(|(_, framework)| *framework)
        .unwrap_or(DEFAULT_TEST_FRAMEWORK)
}
