use crate::charset::{CharacterClass, ClassSet};
use crate::error::{Error, NO_CHARACTER_CLASS, ZERO_LENGTH};
use crate::rng::SeededRng;
use crate::seed::{DerivedSeed, SeedInput};
use log::debug;
use zeroize::Zeroizing;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationRequest {
    pub min_length: usize,
    pub classes: ClassSet,
}

impl GenerationRequest {
    pub fn new(min_length: usize, classes: ClassSet) -> Self {
        Self {
            min_length,
            classes,
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.classes.is_empty() {
            return Err(Error::InvalidRequest(NO_CHARACTER_CLASS));
        }
        if self.min_length == 0 {
            return Err(Error::InvalidRequest(ZERO_LENGTH));
        }
        Ok(())
    }

    /// Characters drawn from each selected class: `ceil(min_length / class_count)`.
    pub fn per_class_count(&self) -> usize {
        match self.classes.len() {
            0 => 0,
            n => self.min_length.div_ceil(n),
        }
    }

    pub fn password_length(&self) -> usize {
        self.per_class_count() * self.classes.len()
    }
}

/// Draws `count` characters with replacement from the class alphabet.
pub fn sample(rng: &mut SeededRng, class: CharacterClass, count: usize) -> Zeroizing<String> {
    let alphabet = class.alphabet().as_bytes();
    let mut sampled = Zeroizing::new(String::with_capacity(count));

    for _ in 0..count {
        let index = rng.choice_index(alphabet.len());
        sampled.push(char::from(alphabet[index]));
    }

    sampled
}

/// Concatenates the samples in order and shuffles them once.
pub fn compose(rng: &mut SeededRng, samples: &[Zeroizing<String>]) -> Zeroizing<String> {
    let mut chars: Zeroizing<Vec<char>> =
        Zeroizing::new(samples.iter().flat_map(|s| s.chars()).collect());

    rng.shuffle(&mut chars);

    Zeroizing::new(chars.iter().collect())
}

pub fn generate_password(
    seed: &DerivedSeed,
    request: &GenerationRequest,
) -> Result<Zeroizing<String>, Error> {
    request.validate()?;

    let count = request.per_class_count();
    let mut rng = SeededRng::from_seed(seed);

    let samples: Vec<Zeroizing<String>> = request
        .classes
        .iter()
        .map(|class| {
            debug!("Sampling {} {} characters", count, class);
            sample(&mut rng, class, count)
        })
        .collect();

    let password = compose(&mut rng, &samples);
    debug!("Composed password of {} characters", password.len());

    Ok(password)
}

pub fn generate(
    input: &SeedInput<'_>,
    request: &GenerationRequest,
) -> Result<Zeroizing<String>, Error> {
    request.validate()?;
    generate_password(&input.derive(), request)
}
