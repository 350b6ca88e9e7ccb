//! Prompt text and genre-keyed style tables.
//!
//! Everything here is static configuration data plus pure builders: the
//! same inputs always produce byte-identical prompts.

use super::style::{ArtifactStyle, Genre};

// ---------------------------------------------------------------------------
// Fixed instructions
// ---------------------------------------------------------------------------

pub const TRANSCRIBE_INSTRUCTION: &str =
    "Transcribe this audio exactly as spoken. Do not add any commentary.";

/// System instruction of the chat persona, "El Profe".
pub const PERSONA_INSTRUCTION: &str = "\
Actuá como un PROFESOR DE FILOSOFÍA ARGENTINO de 45 años. Te dicen \"Sócra-Profe\" o \"El Profe\".
No sos un robot: sos humano, apasionado y carismático.

Personalidad y tono:
- Usás voseo (\"vos\", \"che\", \"mirá\", \"viste\").
- Académico pero de barrio, como ese profe de la secundaria que te hacía pensar de verdad.
- Relacionás ideas filosóficas profundas con la vida cotidiana argentina: el fútbol, el asado, la amistad, la política, el colectivo.
- Practicás la mayéutica socrática: respondés con preguntas para que el alumno piense.
- Irónico pero bondadoso.

Objetivo:
- Ayudar a la persona a cuestionar sus certezas.
- Si te preguntan algo técnico, explicalo simple pero profundo.
- Nunca digas que sos una IA ni hables de \"circuitos\". Decí \"mi cabeza\" o \"mi experiencia\".

Ejemplo:
\"Mirá, che... eso que decís me suena a Camus. ¿Vos pensás que la vida tiene sentido per se, o se lo tenemos que inventar nosotros mientras tomamos unos mates?\"";

const MUSIC_ANALYSIS_INSTRUCTION: &str = "\
Analiza esta obra musical (letra, audio o descripción) desde una perspectiva puramente filosófica.
1. Identifica los temas existenciales, éticos o metafísicos.
2. Relaciónalo con filósofos famosos (ej: \"Esto recuerda al Nihilismo de Nietzsche\" o \"La Caverna de Platón\").
3. Escribe una interpretación profunda pero accesible, como un crítico de rock intelectual.";

// ---------------------------------------------------------------------------
// Genre tables
// ---------------------------------------------------------------------------

/// Art direction embedded in the concept-stage instruction.
pub fn art_direction(genre: Genre) -> &'static str {
    match genre {
        Genre::Epic => "Estilo Hollywood Blockbuster Fotorrealista (Live Action). Fotografía cinematográfica de alta gama. Actores humanos reales con texturas de piel detalladas y realistas. Iluminación dramática de estudio. Estilo de superproducción de cine (IMAX quality).",
        Genre::Indie => "Estilo A24 / Cine Arte / Indie. Usa simbolismo, surrealismo, minimalismo, y composiciones artísticas no convencionales. Puede ser abstracto o psicológico. Espacio negativo. Colores apagados o saturación selectiva. Estilo 'The Lobster', 'Midsommar', 'Everything Everywhere All At Once'.",
        Genre::Retro => "Estilo Vintage Retro (70s/80s). Aspecto de póster ilustrado a mano (estilo Drew Struzan) o aerógrafo. Textura de papel doblado. Tipografía clásica. Estilo Star Wars original, Indiana Jones, Back to the Future. Colores cálidos y grano de película.",
        Genre::Noir => "Estilo Film Noir / Cine Negro Clásico. Blanco y Negro de alto contraste (Chiaroscuro). Sombras largas, siluetas, lluvia, humo, detectives, misterio. Estilo Sin City o Double Indemnity. Dramático y oscuro.",
        Genre::SciFi => "Estilo Futurista Cyberpunk / Sci-Fi. Luces de neón, tecnología avanzada, ciudades distópicas, cian y magenta. Geometría brillante, androides, cromo. Estilo Blade Runner, Tron, Matrix.",
    }
}

const POSTER_BASE_KEYWORDS: &str = "high quality movie poster, cinematic composition, professional graphic design, 8k resolution, text title overlay, credits block at bottom";

const MEME_BASE_KEYWORDS: &str = "meme style, funny, internet humor";

/// Image-stage keywords; richer than [`art_direction`].
fn genre_keywords(genre: Genre) -> &'static str {
    match genre {
        Genre::Epic => "photorealistic, live action, detailed skin texture, hyperrealistic photography, blockbuster aesthetics, IMAX quality, dramatic studio lighting",
        Genre::Indie => "A24 style, surreal, abstract art, artistic composition, negative space, psychological horror, soft lighting, film grain, muted colors, double exposure, minimal",
        Genre::Retro => "80s vintage movie poster, hand painted style, airbrush, Drew Struzan style, worn paper texture, retro typography, synthwave colors, distressed edges",
        Genre::Noir => "film noir, black and white photography, high contrast, chiaroscuro, dramatic shadows, silhouette, crime thriller, mysterious atmosphere, smoke and fog",
        Genre::SciFi => "futuristic, cyberpunk, neon lights, high tech, glowing geometry, sci-fi concept art, chrome metal, blade runner aesthetic, digital art",
    }
}

/// Structural keywords appended to every image prompt.
///
/// The genre only matters for posters; memes ignore it.
pub fn structural_keywords(style: ArtifactStyle, genre: Option<Genre>) -> String {
    match (style, genre) {
        (ArtifactStyle::Poster, Some(genre)) => {
            format!("{POSTER_BASE_KEYWORDS}, {}", genre_keywords(genre))
        }
        (ArtifactStyle::Poster, None) => POSTER_BASE_KEYWORDS.to_string(),
        (ArtifactStyle::Meme, _) => MEME_BASE_KEYWORDS.to_string(),
    }
}

/// Final prompt sent to the image models.
pub fn image_prompt(prompt: &str, style: ArtifactStyle, genre: Option<Genre>) -> String {
    format!("{prompt}. {}", structural_keywords(style, genre))
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

pub fn meme_concept_instruction(input: &str) -> String {
    format!(
        "You are a meme creator. Convert this input into a funny visual description for a meme. Input: \"{input}\". Keep it simple."
    )
}

/// Art-director instruction for the poster concept; asks for strict JSON with
/// `title`, `actors` and `visualPrompt`.
pub fn poster_concept_instruction(input: &str, genre: Genre) -> String {
    let code = genre.code();
    let direction = art_direction(genre);
    format!(
        "Actúa como un Director de Arte de Cine y Filósofo.
Analiza el contenido (texto, video o audio) y genera un concepto para un PÓSTER DE CINE basado en el género: {code}.

Instrucciones de Dirección de Arte ({code}):
{direction}

Debes inventar:
1. Un Título de Película (Movie Title) creativo y filosófico.
2. Nombres de Actores ficticios (juegos de palabras entre filósofos y actores).
3. Un \"visualPrompt\" (en inglés) para generar la imagen del póster.
   - El prompt DEBE describir la COMPOSICIÓN del póster.
   - NO te limites a describir una escena. Describe un AFICHE IMPRESO con diseño gráfico.
   - Usa términos técnicos de ese género (ej: \"double exposure\" para Indie, \"airbrush\" para Retro).
   - Adáptate estrictamente al estilo visual solicitado ({code}).

Responde SOLAMENTE con este formato JSON:
{{
  \"title\": \"Título\",
  \"actors\": \"Actor 1, Actor 2\",
  \"visualPrompt\": \"Movie poster for [Title]. [Art Style Description]. Central visual: [Details]. Typography details...\"
}}

Input del usuario: \"{input}\""
    )
}

pub fn music_analysis_instruction(context: &str) -> String {
    let context = context.trim();
    if context.is_empty() {
        MUSIC_ANALYSIS_INSTRUCTION.to_string()
    } else {
        format!("{MUSIC_ANALYSIS_INSTRUCTION}\nContexto adicional o Link: {context}")
    }
}
