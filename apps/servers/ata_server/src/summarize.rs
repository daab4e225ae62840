use crate::utils::{retry_async, RETRY_BASE_DELAY, RETRY_FACTOR};
use sdk::{ChatClient, ChatError, ChatMessage};
use tracing::info;

/// System instruction for per-chunk summaries. The summary contract is that
/// every document starts with the "Principais Pontos:" header.
pub const SUMMARY_SYSTEM_PROMPT: &str = "Você é um assistente especializado em resumir transcrições de reuniões de câmaras de vereadores. \
	Gere um resumo claro e objetivo, destacando apenas:\n\
	- Principais pontos discutidos\n\
	- Decisões tomadas\n\
	- Ações definidas\n\n\
	Use bullet points, evite repetições e conversas paralelas. \
	Comece o resumo sempre com o título: Principais Pontos:";

/// System instruction for the reduce step that merges partial summaries.
pub const COMBINE_SYSTEM_PROMPT: &str =
	"Combine todos os resumos parciais em um único resumo final claro, organizado em bullet points e começando obrigatoriamente com 'Principais Pontos:'";

/// Split `text` into chunks of up to `chunk_words` whitespace-delimited words.
///
/// Boundaries are word-count based, not sentence-aware; a chunk may end
/// mid-sentence. Rejoining the chunks with single spaces reproduces the
/// whitespace-normalized input.
pub fn chunk_text(text: &str, chunk_words: usize) -> Vec<String> {
	let words: Vec<&str> = text.split_whitespace().collect();

	words.chunks(chunk_words.max(1)).map(|chunk| chunk.join(" ")).collect()
}

/// Two-phase map/reduce summarization.
///
/// The generation model's context window is bounded, so the transcript is
/// summarized chunk by chunk and the partial summaries are merged in one
/// final request. Chunking bounds worst-case latency per request.
pub async fn summarize_transcript(chat: &ChatClient, transcript: &str, chunk_words: usize, temperature: f32, retry_attempts: usize) -> Result<String, ChatError> {
	let chunks = chunk_text(transcript, chunk_words);
	let total = chunks.len();
	let mut partials = Vec::with_capacity(total);

	for (idx, chunk) in chunks.into_iter().enumerate() {
		info!(chunk = idx + 1, total, "summarizing transcript chunk");

		let messages = [ChatMessage::system(SUMMARY_SYSTEM_PROMPT), ChatMessage::user(chunk)];
		let partial = retry_async(|| chat.complete(&messages, temperature), retry_attempts, RETRY_BASE_DELAY, RETRY_FACTOR).await?;

		partials.push(partial);
	}

	info!(partials = partials.len(), "combining partial summaries");

	let combined_prompt = partials.join("\n\n");
	let messages = [ChatMessage::system(COMBINE_SYSTEM_PROMPT), ChatMessage::user(combined_prompt)];

	retry_async(|| chat.complete(&messages, temperature), retry_attempts, RETRY_BASE_DELAY, RETRY_FACTOR).await
}
