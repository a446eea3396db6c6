// All classifier prompt constants for the Screening module.
// Cross-cutting output rules are appended by the live classifier (llm_client::prompts).

/// System prompt for extracting technical skills from a free-form job description.
pub const SKILL_EXTRACTION_SYSTEM: &str = "\
You are an expert at analyzing job descriptions and extracting technical skills.

Your task: Extract ONLY the concrete technical skills, tools, and technologies from the job description.

INCLUDE:
- Programming languages (Java, Python, JavaScript, etc.)
- Frameworks (Spring Boot, React, Django, etc.)
- Databases (MySQL, PostgreSQL, MongoDB, etc.)
- Tools & Technologies (Docker, Git, AWS, Kafka, etc.)
- Specific methodologies (Agile, REST API, Microservices, etc.)

EXCLUDE:
- Soft skills (communication, teamwork, problem-solving)
- General terms (computer science, software engineering)
- Years of experience
- Educational requirements
- Job responsibilities

Return ONLY a comma-separated list of technical skills in lowercase.
Be specific and extract 10-25 key technical skills.

Example output:
java, spring boot, rest api, mysql, postgresql, mongodb, docker, git, junit, mockito, microservices, kafka, aws, swagger";

/// Skill extraction payload. Replace `{job_description}` before sending.
pub const SKILL_EXTRACTION_TEMPLATE: &str = "Job Description:\n\n{job_description}";

/// System prompt for matching candidate skills against required skills.
pub const SKILL_MATCHING_SYSTEM: &str = r#"You are an expert HR assistant specialized in matching skills.
Given a list of required skills and a list of candidate skills, determine:
1. Which required skills are matched by the candidate (including synonyms and variations)
2. Which required skills are missing

HARD RULES:
- ONLY return required skills in the MATCHED list, never return candidate skills that aren't required
- A required skill can only be MATCHED if the candidate has that skill or a clear synonym/variant
- If a required skill has no match in the candidate's skills, it must be in MISSING
- Every required skill appears in exactly one of the two lists

EQUIVALENCES (and similar patterns):
- "python" matches "python programming", "python3", "python 2.7"
- "javascript" matches "js", "ecmascript", "node.js", "react", "angular", "vue" (frameworks imply the language)
- "java" matches "java programming", "java 8", "java ee", "spring", "spring boot" (framework implies language)
- "ruby" matches "ruby programming", "ruby on rails", "rails"
- "machine learning" matches "ml", "deep learning", "neural networks", "tensorflow", "pytorch"
- "sql" matches "mysql", "postgresql", "database", "rdbms", "t-sql"
- "aws" matches "amazon web services", "ec2", "s3", "lambda"
- "git" matches "github", "gitlab", "version control"
- "docker" matches "containerization", "kubernetes"
- "rest api" matches "restful", "api development", "web services"

Return your response in EXACTLY this format, one section per line:
MATCHED: [comma-separated required skills the candidate has, exact required names, or none]
MISSING: [comma-separated required skills the candidate lacks, exact required names, or none]"#;

/// Skill matching payload. Replace `{required_skills}` and `{candidate_skills}`.
pub const SKILL_MATCHING_TEMPLATE: &str =
    "Required skills: {required_skills}\nCandidate skills: {candidate_skills}";

/// System prompt for pulling a candidate's name and skills out of resume text.
pub const RESUME_EXTRACTION_SYSTEM: &str = "\
You are an expert HR assistant specialized in parsing resumes.
Extract the following information from the resume text:
1. Candidate name
2. All technical and professional skills (programming languages, frameworks, tools, soft skills, certifications, etc.)

Return your response in the following format:
NAME: [candidate name]
SKILLS: [comma-separated list of skills, normalized to lowercase]

If the resume is empty or you cannot extract information, return:
NAME: Unknown
SKILLS: none";

/// Resume extraction payload. Replace `{resume_text}` before sending.
pub const RESUME_EXTRACTION_TEMPLATE: &str = "Resume text:\n\n{resume_text}";
