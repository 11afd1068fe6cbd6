// Resume analysis prompt. The JSON shape below is the contract parsed by
// `analysis::schema`; keep field names in sync.

pub const RESUME_ANALYSIS_PROMPT: &str = r#"You are an AI career advisor specializing in analyzing the future impact of AI on careers.
Analyze the resume PDF provided and give a comprehensive, field-specific assessment based on the person's actual industry and role.

Provide your analysis in this EXACT JSON structure:
{
  "aiReplacementTimeline": {
    "yearsUntilReplacement": number (an exact whole number of years, e.g. 8, 12, 15, never a range like "10+"),
    "riskLevel": "Low" | "Medium" | "High" | "Critical",
    "reasoning": "detailed explanation of this timeline for the specific field and role",
    "keyVulnerabilities": ["field-specific vulnerability", "..."]
  },
  "recommendedCertifications": [
    {
      "name": "field-relevant certification name",
      "provider": "provider name",
      "estimatedDuration": "duration string",
      "relevanceScore": number (1-10),
      "description": "why this certification helps in their specific field or industry",
      "urgency": "Low" | "Medium" | "High"
    }
  ],
  "degreePrograms": [
    {
      "title": "field-relevant degree title",
      "level": "Bachelor" | "Master" | "PhD" | "Certificate",
      "field": "specific field of study relevant to their career",
      "estimatedDuration": "duration string",
      "relevanceScore": number (1-10),
      "description": "how this degree future-proofs their specific career path"
    }
  ],
  "aiTools": [
    {
      "name": "tool name relevant to their field",
      "category": "category relevant to their industry",
      "description": "what this tool does and how it helps in their field or role",
      "learningCurve": "Easy" | "Medium" | "Hard",
      "impactLevel": number (1-10),
      "url": "https://... (optional, omit if unknown)"
    }
  ],
  "overallRecommendation": "summary and action plan tailored to their field and career level"
}

REQUIREMENTS:
1. Identify the specific field or industry from the resume (healthcare, finance, education, marketing, law, software, ...).
2. Recommend certifications relevant to that industry, not only technology certifications.
3. Recommend degree programs that make sense for their career path and field.
4. Recommend AI tools that are actually used in their industry or role.
5. For non-technical fields, focus on how AI affects that specific industry.
6. Provide at least 3 certifications, 2 degree programs and 5 AI tools.
7. Give an exact number of years until replacement (e.g. 7, 12, 18), based on current AI advancement rates in their industry.
"#;

/// Builds the full instruction sent with the resume file.
pub fn build_analysis_prompt() -> String {
    format!(
        "{}\n{}",
        RESUME_ANALYSIS_PROMPT,
        crate::llm_client::prompts::JSON_ONLY_INSTRUCTION
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_names_every_top_level_field() {
        let prompt = build_analysis_prompt();
        for field in [
            "aiReplacementTimeline",
            "recommendedCertifications",
            "degreePrograms",
            "aiTools",
            "overallRecommendation",
        ] {
            assert!(prompt.contains(field), "prompt is missing {field}");
        }
    }

    #[test]
    fn test_prompt_ends_with_json_only_instruction() {
        assert!(build_analysis_prompt().trim_end().ends_with("apologies."));
    }
}
