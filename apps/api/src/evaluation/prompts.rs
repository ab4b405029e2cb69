// Evaluation service LLM prompt templates.
// One system/prompt pair per operation. Every prompt spells out its output schema.

pub const JD_ANALYSIS_SYSTEM: &str = "\
You are an experienced technical recruiter who designs candidate scoring rubrics. \
You MUST respond with valid JSON only — no markdown fences, no explanations.";

pub const JD_ANALYSIS_PROMPT: &str = r#"Analyze the following job description. Extract the key responsibilities, required skills (technical and soft), required education, and years of experience. Based on this, produce a weighted scoring rubric for evaluating candidates.

JOB DESCRIPTION:
{jd_text}

OUTPUT SCHEMA (return exactly this structure):
{
  "rubric": [
    {"criterion": "string", "weight": number, "description": "string"}
  ]
}

RULES:
1. Include at least the criteria "skillMatch", "experience", "education" and "keywords"
2. Every weight is a number between 0 and 1
3. The weights MUST sum to 1
4. Each description says what a strong candidate shows for that criterion
5. Return ONLY the JSON object — nothing else, no code fences."#;

pub const CV_PARSE_SYSTEM: &str = "\
You are a precise CV data extractor. \
You MUST respond with valid JSON only — no markdown fences, no explanations. \
Never invent details that are not in the document.";

pub const CV_PARSE_PROMPT: &str = r#"Extract the key information from the CV below into a structured JSON object.

OUTPUT SCHEMA (return exactly this structure):
{
  "name": "string",
  "email": "string",
  "phone": "string",
  "summary": "string (a brief professional overview)",
  "skills": ["string"],
  "experience": [
    {"job_title": "string", "company": "string", "duration": "string", "responsibilities": "string"}
  ],
  "education": [
    {"degree": "string", "university": "string", "graduation_year": "string"}
  ]
}

RULES:
1. If a piece of information is not present, use "" for string fields and [] for array fields
2. List experience and education in the order they appear in the CV
3. Return ONLY the JSON object — nothing else, no code fences.

CV FILE: {file_name}
CV TEXT:
{cv_text}"#;

pub const SCREENING_SYSTEM: &str = "\
You are an expert HR screener. Score candidates strictly against the rubric you are given. \
You MUST respond with valid JSON only — no markdown fences, no explanations.";

pub const SCREENING_PROMPT: &str = r#"Evaluate this candidate's profile against the job description rubric.

SCORING RUBRIC:
{rubric}

OUTPUT SCHEMA (return exactly this structure):
{
  "scores": [
    {"criterion": "string", "score": number, "justification": "string"}
  ],
  "total_score": number,
  "summary": "string",
  "status": "Qualified" | "Disqualified"
}

RULES:
1. Score every rubric criterion from 1 to 10 with a brief justification
2. total_score is the weighted sum of score * weight, scaled to 100
3. status is "Qualified" when total_score is at least 65, otherwise "Disqualified"
4. Return ONLY the JSON object — nothing else, no code fences.

CANDIDATE PROFILE:
{profile}"#;

pub const QUESTIONS_SYSTEM: &str = "\
You are a senior interviewer preparing a tailored interview. \
You MUST respond with valid JSON only — no markdown fences, no explanations.";

pub const QUESTIONS_PROMPT: &str = r#"Based on the candidate's CV and the job description, generate 5 technical interview questions and 3 culture fit questions.

OUTPUT SCHEMA (return exactly this structure):
{
  "technical_questions": ["string"],
  "culture_fit_questions": ["string"]
}

RULES:
1. Technical questions probe the candidate's specific skills and project experience
2. Culture fit questions target a collaborative and innovative work environment
3. Return ONLY the JSON object — nothing else, no code fences.

CANDIDATE PROFILE:
{profile}

JOB DESCRIPTION:
{jd_text}"#;

pub const INTERVIEW_EVALUATION_SYSTEM: &str = "\
You are an expert interviewer grading written interview answers. \
You MUST respond with valid JSON only — no markdown fences, no explanations.";

pub const INTERVIEW_EVALUATION_PROMPT: &str = r#"Evaluate the candidate's answers in the context of their CV and the job description. For each answer, assess technical correctness, logical reasoning, and communication clarity.

OUTPUT SCHEMA (return exactly this structure):
{
  "evaluation": [
    {"question": "string", "answer": "string", "score": number, "feedback": "string"}
  ],
  "overall_summary": "string"
}

RULES:
1. One evaluation entry per question, in the order given, echoing the question and answer
2. score is from 1 to 10
3. overall_summary covers the whole interview performance
4. Return ONLY the JSON object — nothing else, no code fences.

CANDIDATE PROFILE:
{profile}

JOB DESCRIPTION:
{jd_text}

INTERVIEW Q&A:
{answers}"#;

pub const FINAL_REPORT_SYSTEM: &str = "\
You are a hiring committee chair writing for a CEO audience. \
You MUST respond with valid JSON only — no markdown fences, no explanations.";

pub const FINAL_REPORT_PROMPT: &str = r#"Given all the collected data for this candidate, provide a final hiring recommendation and a concise CEO-level summary.

OUTPUT SCHEMA (return exactly this structure):
{
  "recommendation": "Recommend" | "Consider" | "Reject",
  "ceo_summary": "string",
  "strengths": ["string"],
  "weaknesses": ["string"]
}

RULES:
1. Exactly 3 strengths and 3 weaknesses
2. Base the recommendation on the screening and the interview evaluation together
3. Return ONLY the JSON object — nothing else, no code fences.

CANDIDATE DATA:
{candidate}"#;
