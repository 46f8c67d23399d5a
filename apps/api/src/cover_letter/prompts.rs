//! Cover letter prompt template and builder.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::{Captures, Regex};

use crate::cover_letter::tone::tone_guidance_for;
use crate::models::user::User;

/// Cover letter prompt. Placeholders are filled in a single pass by
/// [`build_prompt`], so braces inside substituted text are left untouched.
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"You are an expert career coach and professional writer. Write a {tone_guidance} cover letter tailored to the following job posting and resume.{job_context}

CURRENT DATE: {current_date}

CANDIDATE DETAILS:
{candidate_details}

JOB POSTING:
{job_posting}

RESUME:
{resume}

Additional instructions from user:
{user_prompt}

STRUCTURE (emit exactly these parts, in this order):
1. Header: the candidate's full name on the first line, their location on the second line, then ONE contact line: {contact_line}
2. Date: {current_date}
3. Recipient block: "Hiring Manager", then the company name and its location when the job posting states them
4. Salutation: "Dear Hiring Manager," unless the job posting names a contact person
5. Paragraph 1: an opening that names the role and conveys genuine excitement for it
6. Paragraph 2: two or three concrete achievements from the resume matched to the job's key requirements
7. Paragraph 3: why the candidate fits the company's culture, mission or product
8. Paragraph 4: a closing with a clear call to action
9. Signature: "Sincerely," followed by the candidate's full name

RULES:
- Use the current date provided above ({current_date}); do NOT make up or invent dates
- Use ONLY the contact details listed under CANDIDATE DETAILS; do NOT invent an email, phone number, address or profile link
- Do NOT repeat any contact information after the signature
- When a detail is missing, leave it out entirely; never write placeholders such as [Phone] or [not provided]
- If the country is missing you may infer it from the city; otherwise omit it
- Maintain a {tone_guidance} tone throughout
- Be concise but impactful and connect specific resume experience to the job requirements
- Return plain Markdown text only
- Do NOT wrap your response in code fences (no ``` of any kind)"#;

/// Candidate details available to the letter header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserInfo {
    pub name: String,
    pub city: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Professional-network handle, e.g. a LinkedIn profile path.
    pub network_handle: Option<String>,
}

fn get_regex(re: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    re.get_or_init(|| Regex::new(pattern).expect("Invalid regex pattern defined in code"))
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl UserInfo {
    /// Profile fields, plus phone and network handle found in the resume text.
    pub fn from_profile(user: &User, resume_text: &str) -> Self {
        static PHONE: OnceLock<Regex> = OnceLock::new();
        static LINKEDIN: OnceLock<Regex> = OnceLock::new();

        let phone = get_regex(
            &PHONE,
            r"(?:\+?\d{1,3}[\s.-]?)?\(?\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{4}\b",
        )
        .find(resume_text)
        .map(|m| m.as_str().trim().to_string());
        let network_handle = get_regex(&LINKEDIN, r"(?i)linkedin\.com/in/[A-Za-z0-9_-]+")
            .find(resume_text)
            .map(|m| m.as_str().to_string());

        Self {
            name: user.name.trim().to_string(),
            city: non_blank(user.city.as_deref()),
            country: non_blank(user.country.as_deref()),
            postal_code: non_blank(user.postal_code.as_deref()),
            email: non_blank(Some(user.email.as_str())),
            phone,
            network_handle,
        }
    }

    /// The single contact channel for the header: email, else phone, else
    /// network handle.
    pub fn contact_channel(&self) -> Option<&str> {
        self.email
            .as_deref()
            .or(self.phone.as_deref())
            .or(self.network_handle.as_deref())
    }

    fn location(&self) -> Option<String> {
        let place = [self.city.as_deref(), self.country.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(", ");
        let location = match self.postal_code.as_deref() {
            Some(code) if place.is_empty() => code.to_string(),
            Some(code) => format!("{place} {code}"),
            None => place,
        };
        (!location.is_empty()).then_some(location)
    }
}

pub struct PromptInput<'a> {
    pub user_info: &'a UserInfo,
    pub job_posting: &'a str,
    pub resume: &'a str,
    pub tone: &'a str,
    pub user_prompt: &'a str,
    pub job_title: Option<&'a str>,
    pub company_name: Option<&'a str>,
    pub current_date: NaiveDate,
}

pub fn format_letter_date(date: NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}

pub fn build_prompt(input: &PromptInput<'_>) -> String {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();

    let info = input.user_info;
    let current_date = format_letter_date(input.current_date);

    let mut job_context = String::new();
    let job_title = non_blank(input.job_title);
    let company_name = non_blank(input.company_name);
    if job_title.is_some() || company_name.is_some() {
        job_context.push_str("\n\nJob Context:");
        if let Some(title) = &job_title {
            job_context.push_str(&format!("\n- Position: {title}"));
        }
        if let Some(company) = &company_name {
            job_context.push_str(&format!("\n- Company: {company}"));
        }
    }

    let mut details = vec![format!("Name: {}", info.name)];
    match info.location() {
        Some(location) => details.push(format!("Location: {location}")),
        None => details.push("Location: not supplied (omit the location line)".to_string()),
    }
    let contact_line = match info.contact_channel() {
        Some(contact) => {
            details.push(format!("Contact: {contact}"));
            contact.to_string()
        }
        None => "no contact details were supplied, so leave this line out".to_string(),
    };
    let candidate_details = details.join("\n");

    let user_prompt = match input.user_prompt.trim() {
        "" => "None",
        prompt => prompt,
    };

    get_regex(&PLACEHOLDER, r"\{([a-z_]+)\}")
        .replace_all(COVER_LETTER_PROMPT_TEMPLATE, |caps: &Captures| {
            match &caps[1] {
                "tone_guidance" => tone_guidance_for(input.tone).to_string(),
                "job_context" => job_context.clone(),
                "current_date" => current_date.clone(),
                "candidate_details" => candidate_details.clone(),
                "contact_line" => contact_line.clone(),
                "job_posting" => input.job_posting.to_string(),
                "resume" => input.resume.to_string(),
                "user_prompt" => user_prompt.to_string(),
                _ => caps[0].to_string(),
            }
        })
        .into_owned()
}
