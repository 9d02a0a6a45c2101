use super::{StrategyCategory, StrategyContext, StrategyRecord};

/// Builds a record; `category` is filled in by [`generate`]
fn record(
    title: impl Into<String>,
    description: impl Into<String>,
    platforms: &[&str],
    revenue_estimate: &str,
    time_investment: &str,
    steps: Vec<String>,
) -> StrategyRecord {
    StrategyRecord {
        title: title.into(),
        description: description.into(),
        category: String::new(),
        platforms: platforms.iter().map(|p| p.to_string()).collect(),
        revenue_estimate: revenue_estimate.to_string(),
        time_investment: time_investment.to_string(),
        steps,
    }
}

fn steps(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// First letter upper case, the rest lower case
pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Strategies of one category for `context`
pub fn generate(category: StrategyCategory, context: &StrategyContext) -> Vec<StrategyRecord> {
    let mut strategies = match category {
        StrategyCategory::ContentRepurposing => content_repurposing(context),
        StrategyCategory::CourseCreation => course_creation(context),
        StrategyCategory::ApplicationDevelopment => application_development(context),
        StrategyCategory::Consulting => consulting(context),
        StrategyCategory::AffiliateMarketing => affiliate_marketing(context),
    };
    for strategy in &mut strategies {
        strategy.category = category.key().to_string();
    }
    strategies
}

/// Short-form video, infographics and blog articles
pub fn content_repurposing(context: &StrategyContext) -> Vec<StrategyRecord> {
    let technology = context.technologies.first();
    let keyword = context.keywords.first();

    vec![
        record(
            "Short-form Video Content",
            "Create concise educational shorts focusing on specific concepts.",
            &["TikTok", "YouTube Shorts", "Instagram Reels"],
            "Medium",
            "Low",
            vec![
                technology.map_or_else(
                    || "Create a 'Tech Concept in 60 seconds' series".to_string(),
                    |t| format!("Create a '{} in 60 seconds' series", t),
                ),
                "Highlight code snippets with explanations".to_string(),
                "Demonstrate quick technical tips and tricks".to_string(),
            ],
        ),
        record(
            "Technical Infographics",
            "Transform complex concepts into visual learning materials.",
            &["Pinterest", "Instagram", "Twitter", "LinkedIn"],
            "Low to Medium",
            "Medium",
            vec![
                technology.map_or_else(
                    || "Create technology cheat sheets".to_string(),
                    |t| format!("Create a '{} cheat sheet'", t),
                ),
                "Design flow diagrams explaining technical processes".to_string(),
                "Visualize comparisons between similar technologies".to_string(),
            ],
        ),
        record(
            "Technical Blog Articles",
            "Expand on key concepts in detailed articles for Medium or a personal blog.",
            &["Medium", "Dev.to", "Personal blog", "LinkedIn articles"],
            "Medium",
            "Medium to High",
            vec![
                keyword.map_or_else(
                    || "Write deep dives on key concepts".to_string(),
                    |k| format!("Write a deep dive on '{}'", k),
                ),
                "Create step-by-step tutorials based on video content".to_string(),
                "Write comparison articles between technologies".to_string(),
            ],
        ),
    ]
}

/// Mastery course, starter kit and workshops
pub fn course_creation(context: &StrategyContext) -> Vec<StrategyRecord> {
    let focus = context.technologies.first().map_or("technology", String::as_str);
    let mut strategies = vec![record(
        format!("{} Mastery Course", focus),
        format!("Create a comprehensive online course teaching {}.", focus),
        &["Udemy", "Teachable", "Podia", "Skillshare"],
        "High",
        "High",
        vec![
            format!("Build a '{} from Zero to Hero' course", focus),
            format!("Create a project-based course using {}", focus),
            "Include hands-on exercises and projects".to_string(),
        ],
    )];

    if let Some(repo) = context.repositories.first() {
        let repo_type = repo.application_type.as_str();
        strategies.push(record(
            format!("{} Starter Kit", capitalize(repo_type)),
            format!("Create and sell code templates and starter kits for {} development.", repo_type),
            &["Gumroad", "Personal website", "GitHub Sponsors"],
            "Medium",
            "Medium",
            vec![
                format!("Build a premium {} template with documentation", repo_type),
                "Offer different tiers with varying features".to_string(),
                "Include video tutorials explaining how to use the template".to_string(),
            ],
        ));
    }

    let topic = context.technologies.first().map_or("technical concepts", String::as_str);
    strategies.push(record(
        "Live Technical Workshops",
        format!("Host live interactive workshops teaching {}.", topic),
        &["Zoom", "Workshop platforms", "Local meetups"],
        "Medium to High",
        "Medium",
        steps(&[
            "Host monthly workshops focused on specific techniques",
            "Create a series of progressive workshops building on each other",
            "Record workshops and sell as on-demand content",
        ]),
    ));
    strategies
}

/// SaaS, mobile app for frontend types, white-label; nothing without a repository
pub fn application_development(context: &StrategyContext) -> Vec<StrategyRecord> {
    let Some(repo) = context.repositories.first() else {
        return Vec::new();
    };
    let name = if repo.name.is_empty() { "application" } else { repo.name.as_str() };

    let mut strategies = vec![record(
        format!("{} as a Service", capitalize(name)),
        "Develop the repository into a SaaS product with a freemium model.",
        &["AWS", "Heroku", "DigitalOcean", "Vercel"],
        "High",
        "High",
        steps(&[
            "Identify core functionality that can be offered as a service",
            "Create a tiered pricing model with free and premium features",
            "Add monitoring, analytics, and user management features",
        ]),
    )];

    if repo.application_type.is_frontend() {
        strategies.push(record(
            format!("{} Mobile App", capitalize(name)),
            format!("Convert the {} application into a mobile app.", repo.application_type.as_str()),
            &["App Store", "Google Play Store"],
            "Medium to High",
            "High",
            steps(&[
                "Use React Native or Flutter to convert the web app",
                "Add mobile-specific features using device capabilities",
                "Implement both free and premium versions",
            ]),
        ));
    }

    strategies.push(record(
        "White-Label Solution",
        format!("Offer the {} application as a customizable solution for businesses.", name),
        &["Direct B2B sales", "Marketplaces"],
        "High",
        "Medium",
        steps(&[
            "Create a customization framework for easy branding",
            "Develop documentation for integration",
            "Offer setup and customization services",
        ]),
    ));
    strategies
}

/// Technology consulting, implementation services and corporate training
pub fn consulting(context: &StrategyContext) -> Vec<StrategyRecord> {
    let focus = context.technologies.first().map_or("technology", String::as_str);
    let mut strategies = vec![record(
        format!("{} Consulting", focus),
        format!("Offer consulting services for companies adopting {}.", focus),
        &["Upwork", "Toptal", "LinkedIn", "Personal website"],
        "High",
        "High",
        vec![
            format!("Offer {} architecture review services", focus),
            format!("Provide implementation guidance for {} projects", focus),
            "Create a productized consulting package with fixed scope and price".to_string(),
        ],
    )];

    if let Some(repo) = context.repositories.first() {
        let name = if repo.name.is_empty() { "solution" } else { repo.name.as_str() };
        strategies.push(record(
            format!("{} Implementation Services", capitalize(name)),
            format!("Help companies implement and customize the {} solution.", name),
            &["Fiverr", "Upwork", "Direct outreach"],
            "Medium to High",
            "Medium",
            steps(&[
                "Create standardized implementation packages",
                "Offer ongoing maintenance and support services",
                "Develop custom features for clients",
            ]),
        ));
    }

    let topic = context.technologies.first().map_or("modern technologies", String::as_str);
    strategies.push(record(
        "Corporate Technical Training",
        format!("Provide specialized training for development teams on {}.", topic),
        &["Corporate training programs", "Direct B2B sales"],
        "High",
        "Medium",
        steps(&[
            "Develop customized training curricula for companies",
            "Offer ongoing learning programs with monthly workshops",
            "Create assessment tools to measure team progress",
        ]),
    ));
    strategies
}

/// Tool, learning-resource and hosting affiliates
pub fn affiliate_marketing(context: &StrategyContext) -> Vec<StrategyRecord> {
    let tech_list = if context.technologies.is_empty() {
        "relevant technologies".to_string()
    } else {
        context.technologies.iter().take(3).cloned().collect::<Vec<_>>().join(", ")
    };

    vec![
        record(
            "Technology Tool Affiliates",
            format!("Promote tools and services related to {} through affiliate programs.", tech_list),
            &["Blog posts", "YouTube videos", "Social media"],
            "Medium",
            "Low",
            steps(&[
                "Create honest reviews of tools you actually use",
                "Develop comparison guides for similar products",
                "Create resource pages listing recommended tools",
            ]),
        ),
        record(
            "Learning Resource Affiliates",
            "Promote online courses, books, and learning platforms with affiliate programs.",
            &["Blog posts", "Email newsletters", "Social media"],
            "Medium",
            "Low",
            steps(&[
                "Create a 'learning path' resource with affiliated course links",
                "Write book reviews with affiliate links",
                "Offer special discounts through affiliate partnerships",
            ]),
        ),
        record(
            "Hosting and Service Affiliates",
            "Promote hosting platforms, development tools, and services.",
            &["Tutorial content", "Setup guides", "Social media"],
            "Medium to High",
            "Low",
            steps(&[
                "Create deployment tutorials using specific hosting services",
                "Develop guides for setting up development environments",
                "Showcase how to implement specific features using paid services",
            ]),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::ApplicationType;
    use crate::strategy::StrategyRepository;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn repo(name: &str, application_type: ApplicationType) -> StrategyRepository {
        StrategyRepository { name: name.into(), application_type }
    }

    #[test]
    fn test_empty_context_uses_fallback_wording() {
        let ctx = StrategyContext::default();

        let content = content_repurposing(&ctx);
        assert_eq!(content[0].steps[0], "Create a 'Tech Concept in 60 seconds' series");
        assert_eq!(content[1].steps[0], "Create technology cheat sheets");
        assert_eq!(content[2].steps[0], "Write deep dives on key concepts");

        let courses = course_creation(&ctx);
        assert_eq!(courses.len(), 2);
        assert_eq!(courses[0].title, "technology Mastery Course");
        assert_eq!(courses[1].description, "Host live interactive workshops teaching technical concepts.");

        assert!(application_development(&ctx).is_empty());
        assert_eq!(
            affiliate_marketing(&ctx)[0].description,
            "Promote tools and services related to relevant technologies through affiliate programs."
        );
    }

    #[test]
    fn test_templates_interpolate_first_values() {
        let ctx = StrategyContext {
            technologies: vec!["Python".into(), "Django".into(), "Docker".into(), "AWS".into()],
            keywords: vec!["migrations".into()],
            repositories: vec![repo("blogEngine", ApplicationType::Django)],
            ..StrategyContext::default()
        };

        assert_eq!(content_repurposing(&ctx)[2].steps[0], "Write a deep dive on 'migrations'");
        let courses = course_creation(&ctx);
        assert_eq!(courses[1].title, "Django Starter Kit");
        assert_eq!(courses[1].steps[0], "Build a premium django template with documentation");

        let consulting = consulting(&ctx);
        assert_eq!(consulting[1].title, "Blogengine Implementation Services");
        assert_eq!(
            affiliate_marketing(&ctx)[0].description,
            "Promote tools and services related to Python, Django, Docker through affiliate programs."
        );
    }

    #[test_case(ApplicationType::React, 3 ; "react gets a mobile app")]
    #[test_case(ApplicationType::NextJs, 3 ; "nextjs is a frontend")]
    #[test_case(ApplicationType::Flask, 2 ; "backend has no mobile app")]
    #[test_case(ApplicationType::Unknown, 2 ; "unknown has no mobile app")]
    fn test_mobile_app_only_for_frontends(application_type: ApplicationType, expected: usize) {
        let ctx = StrategyContext { repositories: vec![repo("todo", application_type)], ..StrategyContext::default() };
        assert_eq!(application_development(&ctx).len(), expected);
    }

    #[test]
    fn test_generate_sets_category_key() {
        let ctx = StrategyContext::default();
        for strategy in generate(StrategyCategory::AffiliateMarketing, &ctx) {
            assert_eq!(strategy.category, "affiliate_marketing");
        }
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("myApp"), "Myapp");
        assert_eq!(capitalize(""), "");
    }
}
