//! Built-in content: the topic catalog, predefined multiple-choice exercises,
//! predefined open-answer exercises and the hard fallbacks.
//!
//! This guarantees the playbook is useful without any provider credentials.

use crate::domain::{AnswerLetter, Exercise, OpenExercise, Topic};

/// Subject → ordered categories. Order matters: the prompt matcher is first-match-wins.
const CATALOG: &[(&str, &[&str])] = &[
  ("Matematika", &["Kvadratne enačbe", "Linearne enačbe", "Odvodi", "Verjetnost"]),
  ("Fizika", &["Newtonovi zakoni", "Elektrika", "Optika"]),
  ("Kemija", &["Periodni sistem", "Kemijske reakcije"]),
  ("Programiranje", &["Python", "JavaScript", "Algoritmi"]),
  ("Angleščina", &["Slovnica", "Besedišče"]),
];

#[derive(Clone, Copy)]
struct ExerciseDef {
  subject: &'static str,
  category: &'static str,
  question: &'static str,
  options: [&'static str; 4],
  answer: AnswerLetter,
  explanation: &'static str,
}

#[derive(Clone, Copy)]
struct OpenDef {
  subject: &'static str,
  category: &'static str,
  question: &'static str,
  solution: &'static str,
}

macro_rules! mc {
  ($subject:expr, $category:expr, $q:expr, [$a:expr, $b:expr, $c:expr, $d:expr], $ans:ident, $expl:expr) => {
    ExerciseDef {
      subject: $subject,
      category: $category,
      question: $q,
      options: [$a, $b, $c, $d],
      answer: AnswerLetter::$ans,
      explanation: $expl,
    }
  };
}

macro_rules! open {
  ($subject:expr, $category:expr, $q:expr, $sol:expr) => {
    OpenDef { subject: $subject, category: $category, question: $q, solution: $sol }
  };
}

const EXERCISES: &[ExerciseDef] = &[
  mc!("Matematika", "Kvadratne enačbe",
    "Kateri sta rešitvi enačbe x² - 5x + 6 = 0?",
    ["x = 2 in x = 3", "x = -2 in x = -3", "x = 1 in x = 6", "x = -1 in x = 6"], A,
    "Enačbo razstavimo: (x - 2)(x - 3) = 0, zato sta rešitvi 2 in 3."),
  mc!("Matematika", "Kvadratne enačbe",
    "Koliko je diskriminanta enačbe x² + 4x + 4 = 0?",
    ["16", "8", "0", "-4"], C,
    "D = b² - 4ac = 16 - 16 = 0, enačba ima eno dvojno rešitev."),
  mc!("Matematika", "Linearne enačbe",
    "Reši enačbo 3x + 7 = 22.",
    ["x = 3", "x = 5", "x = 7", "x = 15"], B,
    "Odštejemo 7 in delimo s 3: 3x = 15, x = 5."),
  mc!("Matematika", "Odvodi",
    "Kaj je odvod funkcije f(x) = x³?",
    ["x²", "3x", "3x²", "x⁴ / 4"], C,
    "Po pravilu za potence je (xⁿ)' = n·xⁿ⁻¹, torej 3x²."),
  mc!("Matematika", "Verjetnost",
    "Kolikšna je verjetnost, da pri metu poštene kocke pade sodo število?",
    ["1/6", "1/3", "1/2", "2/3"], C,
    "Soda števila so 2, 4 in 6: 3 ugodni izidi od 6 možnih."),
  mc!("Fizika", "Newtonovi zakoni",
    "Kateri Newtonov zakon pravi, da je F = m·a?",
    ["Prvi zakon", "Drugi zakon", "Tretji zakon", "Zakon gravitacije"], B,
    "Drugi Newtonov zakon povezuje rezultanto sil, maso in pospešek."),
  mc!("Fizika", "Elektrika",
    "Kolikšen tok teče skozi upornik 10 Ω pri napetosti 5 V?",
    ["0,5 A", "2 A", "5 A", "50 A"], A,
    "Po Ohmovem zakonu je I = U / R = 5 V / 10 Ω = 0,5 A."),
  mc!("Fizika", "Optika",
    "Kaj se zgodi s svetlobo pri prehodu iz zraka v vodo?",
    ["Pospeši se", "Lomi se proti vpadni pravokotnici", "Popolnoma se odbije", "Ne spremeni smeri"], B,
    "Voda je optično gostejša, zato se žarek lomi proti pravokotnici."),
  mc!("Kemija", "Periodni sistem",
    "Kateri element ima kemijski simbol Na?",
    ["Dušik", "Neon", "Natrij", "Nikelj"], C,
    "Na izhaja iz latinskega imena natrium."),
  mc!("Kemija", "Kemijske reakcije",
    "Kaj nastane pri reakciji kisline z bazo?",
    ["Sol in voda", "Samo plin", "Kovina", "Oksid in vodik"], A,
    "Nevtralizacija kisline in baze da sol in vodo."),
  mc!("Programiranje", "Python",
    "Kaj izpiše print(len([1, 2, 3]))?",
    ["2", "3", "[1, 2, 3]", "Napaka"], B,
    "Funkcija len vrne število elementov seznama, ki ima tri elemente."),
  mc!("Programiranje", "JavaScript",
    "Kakšen je rezultat izraza typeof null?",
    ["\"null\"", "\"undefined\"", "\"object\"", "\"number\""], C,
    "Zaradi zgodovinske posebnosti jezika typeof null vrne \"object\"."),
  mc!("Programiranje", "Algoritmi",
    "Kakšna je časovna zahtevnost dvojiškega iskanja v urejenem seznamu?",
    ["O(1)", "O(log n)", "O(n)", "O(n log n)"], B,
    "Vsak korak razpolovi iskalni interval."),
  mc!("Angleščina", "Slovnica",
    "Izberi pravilno obliko: She ___ to school every day.",
    ["go", "goes", "going", "gone"], B,
    "V present simple dobi glagol v 3. osebi ednine končnico -s/-es."),
  mc!("Angleščina", "Besedišče",
    "Kaj pomeni angleška beseda \"reliable\"?",
    ["Zanesljiv", "Pozabljiv", "Radoveden", "Nestrpen"], A,
    "\"Reliable\" opisuje nekoga ali nekaj, na kar se lahko zanesemo."),
];

const OPEN_EXERCISES: &[OpenDef] = &[
  open!("Matematika", "Kvadratne enačbe",
    "Reši enačbo x² - 7x + 10 = 0.",
    "Razstavimo: (x - 2)(x - 5) = 0, torej x = 2 ali x = 5."),
  open!("Matematika", "Linearne enačbe",
    "Reši enačbo 2(x - 3) = 10.",
    "Delimo z 2: x - 3 = 5, torej x = 8."),
  open!("Fizika", "Newtonovi zakoni",
    "Kolikšen pospešek dobi telo z maso 2 kg, če nanj deluje sila 10 N?",
    "a = F / m = 10 N / 2 kg = 5 m/s²."),
  open!("Programiranje", "Python",
    "Napiši funkcijo, ki vrne vsoto vseh sodih števil v seznamu.",
    "def vsota_sodih(seznam):\n    return sum(x for x in seznam if x % 2 == 0)"),
];

/// Ordered topic catalog.
pub fn seed_topics() -> Vec<Topic> {
  CATALOG
    .iter()
    .map(|(subject, categories)| Topic {
      subject: (*subject).to_string(),
      categories: categories.iter().map(|c| (*c).to_string()).collect(),
    })
    .collect()
}

/// Predefined multiple-choice exercises as (subject, category, exercise), in authoring order.
pub fn seed_exercises() -> Vec<(String, String, Exercise)> {
  EXERCISES
    .iter()
    .map(|d| {
      let ex = Exercise {
        question: d.question.to_string(),
        options: d.options.map(str::to_string),
        correct_answer: d.answer,
        explanation: d.explanation.to_string(),
      };
      (d.subject.to_string(), d.category.to_string(), ex)
    })
    .collect()
}

/// Predefined open-answer exercises as (subject, category, exercise).
pub fn seed_open_exercises() -> Vec<(String, String, OpenExercise)> {
  OPEN_EXERCISES
    .iter()
    .map(|d| {
      let ex = OpenExercise { question: d.question.to_string(), solution: d.solution.to_string() };
      (d.subject.to_string(), d.category.to_string(), ex)
    })
    .collect()
}

/// Absolute last-resort fallback when the bank holds nothing usable.
pub fn hard_fallback_exercise() -> Exercise {
  Exercise {
    question: "Koliko je 2 + 2?".into(),
    options: ["3".into(), "4".into(), "5".into(), "22".into()],
    correct_answer: AnswerLetter::B,
    explanation: "Seštevek dveh in dveh je štiri.".into(),
  }
}

/// Generic open-answer exercise for any subject/category without predefined content.
pub fn generic_open_exercise(subject: &str, category: &str) -> OpenExercise {
  OpenExercise {
    question: format!("Razloži s svojimi besedami osnovni pojem iz področja \"{category}\" ({subject}) in navedi en primer."),
    solution: format!("Dober odgovor jasno definira ključni pojem iz področja \"{category}\", ga poveže s predmetom {subject} in ga ponazori s konkretnim primerom."),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn every_catalog_pair_has_a_predefined_exercise() {
    let exercises = seed_exercises();
    for topic in seed_topics() {
      for cat in &topic.categories {
        assert!(
          exercises.iter().any(|(s, c, _)| s == &topic.subject && c == cat),
          "missing exercise for {} / {}",
          topic.subject,
          cat
        );
      }
    }
  }

  #[test]
  fn seed_exercises_reference_catalog_pairs_only() {
    let topics = seed_topics();
    for (s, c, _) in seed_exercises() {
      let t = topics.iter().find(|t| t.subject == s).expect("subject in catalog");
      assert!(t.categories.contains(&c), "{s} / {c} not in catalog");
    }
  }
}
