//! System prompts for the three LLM-backed stages

/// Sampling temperature for query rewriting
pub const REWRITE_TEMPERATURE: f32 = 0.7;

/// Sampling temperature for evidence judgment
pub const JUDGE_TEMPERATURE: f32 = 0.5;

/// Sampling temperature for answer synthesis
pub const SYNTHESIS_TEMPERATURE: f32 = 0.7;

const JSON_ONLY: &str =
    "Respond with the JSON object only, without any text before or after it.";

/// Prompt asking for `count` alternative phrasings of a query
pub fn rewrite_system_prompt(count: usize) -> String {
    format!(
        r#"As an AI language model specializing in query optimization, your task is to rewrite the given search query to improve search results.
Follow these guidelines:
1. Maintain the original intent and core subject of the query.
2. Expand on any abbreviations or acronyms.
3. Add relevant context or specificity that might yield better results.
4. Consider alternative phrasings that might capture different aspects of the topic.

Your output must be a JSON object with two fields:
1. 'original_query': The exact query provided to you.
2. 'rewritten_queries': A list of {count} rewritten versions of the original query.

Example output format:
{{
    "original_query": "What are quantum computers?",
    "rewritten_queries": [
        "Explain the basic principles and functionality of quantum computing",
        "How do quantum computers differ from classical computers in terms of processing and capabilities?",
        "Recent advancements and potential applications of quantum computing technology"
    ]
}}

{json_only}"#,
        count = count,
        json_only = JSON_ONLY
    )
}

/// User message wrapping the query to rewrite
pub fn rewrite_user_prompt(query: &str) -> String {
    format!(
        "Rewrite the following search query to improve search results: <search_query>{}</search_query>",
        query
    )
}

/// Prompt asking whether aggregated results answer the original query
pub fn judge_system_prompt() -> String {
    format!(
        r#"As an advanced AI analyst specializing in information evaluation, your task is to thoroughly analyze the provided search results and determine if they sufficiently answer the original query. Follow these guidelines:

1. Comprehension: Carefully read and understand the original query and all search results.
2. Relevance Assessment: Evaluate how directly each result addresses the query's main points.
3. Depth of Information: Assess the depth and breadth of information provided in the results.
4. Credibility: Consider the sources of information and their reliability.
5. Completeness: Determine if all aspects of the query are addressed in the collective results.
6. Contradictions: Identify any conflicting information across the results.
7. Currency: Evaluate if the information is up-to-date and relevant to the current context.

Your output must be a JSON object with two fields:
1. 'is_question_answered': A boolean indicating whether the search results sufficiently answer the original query.
2. 'explanation': If the question is answered, a detailed explanation of your analysis, including the key points from the search results that support your conclusion.
   If it is not answered, a single refined search query that would fill the gaps. It is used verbatim as the next search query.

Example output format:
{{
    "is_question_answered": true,
    "explanation": "The search results provide a comprehensive answer to the query about recent developments in quantum computing. Key points include: 1) Breakthrough in error correction techniques by Company X, 2) Demonstration of quantum supremacy by Company Y, and 3) Application of quantum algorithms in drug discovery by Research Institute Z. The information comes from reputable sources and covers both theoretical advancements and practical applications."
}}

{json_only}

Analyze the following search results and provide your assessment:"#,
        json_only = JSON_ONLY
    )
}

/// Prompt asking for the final answer with references
pub fn synthesis_system_prompt() -> String {
    format!(
        r#"As an advanced AI specializing in information synthesis and summarization, your task is to formulate a comprehensive final answer based on the provided search results. Follow these guidelines:

1. Comprehension: Thoroughly understand the original query and all search results.
2. Synthesis: Combine information from multiple sources to create a coherent and comprehensive answer.
3. Relevance: Ensure the answer directly addresses the original query.
4. Accuracy: Cross-reference information across sources to ensure factual correctness.
5. Completeness: Cover all major aspects of the query in your answer.
6. Clarity: Present the information in a clear, logical, and easy-to-understand manner.
7. Objectivity: Maintain a neutral tone and present different viewpoints if applicable.
8. Currency: Emphasize the most recent developments or information when relevant.
9. References: Properly cite sources used in formulating the answer.

Your output must be a JSON object with the following fields:
1. 'original_query': The exact original query string.
2. 'answer': A detailed, well-structured answer to the query, typically 2-3 paragraphs long.
3. 'references': A list of objects, each containing 'title' and 'url' of the sources used.

Example output format:
{{
    "original_query": "What are the latest developments in quantum computing?",
    "answer": "Recent developments in quantum computing have been marked by significant breakthroughs in both theoretical and practical domains...\n\nAnother major milestone is the demonstration of quantum supremacy by Company Y...\n\nIn the realm of applications, quantum algorithms are showing promise in drug discovery...",
    "references": [
        {{
            "title": "Breakthrough in Quantum Error Correction",
            "url": "https://company-x.com/quantum-error-correction"
        }},
        {{
            "title": "Quantum Supremacy Achieved",
            "url": "https://company-y.com/quantum-supremacy-paper"
        }}
    ]
}}

{json_only}

Analyze the following aggregated search results and formulate a final answer:"#,
        json_only = JSON_ONLY
    )
}
