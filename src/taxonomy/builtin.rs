//! Built-in taxonomy tables of the serverless corpus

use super::{Fallback, Taxonomies, Taxonomy};

const PLATFORM: &[(&str, &str)] = &[
    ("aws", "AWS"),
    ("azure", "Azure"),
    ("gcp", "GCP"),
    ("firebase", "GCP"),
    ("cloudflare", "Cloudflare"),
    ("vercel", "Vercel"),
    ("netlify", "Netlify"),
    ("openwhisk", "OpenWhisk"),
    ("fastly", "Fastly"),
    ("unknown", "Unknown"),
];

const FRAMEWORK: &[(&str, &str)] = &[
    ("aws_cloudformation_and_sam", "AWS CloudFormation & SAM"),
    ("serverless", "Serverless"),
    ("azure_functions", "Azure Functions"),
    ("wrangler", "Wrangler"),
    ("firebase", "Firebase"),
    ("terraform", "Terraform"),
    ("aws_cdk_and_sst", "AWS CDK & SST"),
    ("vercel", "Vercel"),
    ("azure_durable_functions", "Azure Durable Functions"),
    ("azure_resource_manager", "Azure Resource Manager"),
    ("architect", "Architect"),
    ("netlify", "Netlify"),
    ("hono", "Hono"),
    ("openwhisk", "OpenWhisk"),
    ("alexa_skills_kit", "Alexa Skills Kit"),
    ("fastly", "Fastly"),
    ("gcp_functions", "GCP Functions"),
];

const FRAMEWORK_CATEGORY: &[(&str, &str)] = &[
    ("aws_cloudformation_and_sam", "IaC"),
    ("serverless", "Third-party"),
    ("azure_functions", "General-purpose Cloud Provider"),
    ("wrangler", "Specialized Cloud Provider"),
    ("firebase", "Specialized Cloud Provider"),
    ("terraform", "IaC"),
    ("aws_cdk_and_sst", "IaC"),
    ("vercel", "Specialized Cloud Provider"),
    ("azure_durable_functions", "General-purpose Cloud Provider"),
    ("azure_resource_manager", "IaC"),
    ("architect", "Third-party"),
    ("netlify", "Specialized Cloud Provider"),
    ("hono", "Third-party"),
    ("openwhisk", "Self-hosted"),
    ("alexa_skills_kit", "Third-party"),
    ("fastly", "Specialized Cloud Provider"),
    ("gcp_functions", "General-purpose Cloud Provider"),
];

const INVOCATION_TYPE: &[(&str, &str)] = &[
    ("http", "HTTP"),
    ("other", "Event"),
    ("queue", "Queue"),
    ("schedule", "Schedule"),
    ("topic", "Topic"),
    ("unknown", "Unknown"),
];

const EXECUTION_LOCATION: &[(&str, &str)] = &[
    ("region", "Region"),
    ("edge", "Edge"),
    ("unknown", "Unknown"),
];

// Lines of code are broken down into the web languages; everything else is "Other".
const LANGUAGE: &[(&str, &str)] = &[
    ("JavaScript", "JavaScript"),
    ("TypeScript", "TypeScript"),
    ("JSX", "JSX"),
    ("HTML", "HTML, CSS & Sass"),
    ("CSS", "HTML, CSS & Sass"),
    ("Sass", "HTML, CSS & Sass"),
];

/// Label that unmapped languages collapse into.
pub const OTHER_LANGUAGE: &str = "Other";

fn table(name: &str, entries: &[(&str, &str)]) -> Taxonomy {
    Taxonomy::new(name, entries.iter().copied())
}

impl Taxonomies {
    /// The taxonomies of the serverless corpus.
    pub fn builtin() -> Self {
        Self {
            platform: table("platform", PLATFORM),
            framework: table("framework", FRAMEWORK),
            framework_category: table("framework_category", FRAMEWORK_CATEGORY),
            invocation_type: table("invocation_type", INVOCATION_TYPE),
            execution_location: table("execution_location", EXECUTION_LOCATION),
            language: table("language", LANGUAGE)
                .with_fallback(Fallback::Label(OTHER_LANGUAGE.to_string())),
        }
    }
}
