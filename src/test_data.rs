#[cfg(test)]
pub const POST_A: &str = "---
title: A
date: 2024-01-01
spoiler: x
related:
  - b
---

First post.
";

#[cfg(test)]
pub const POST_B: &str = "---
title: B
date: 2024-01-02
spoiler: y
---

Second post.
";

#[cfg(test)]
pub const POST_DANGLING: &str = "---
title: C
date: 2024-01-03
spoiler: z
related: [missing]
---

Points nowhere.
";

#[cfg(test)]
pub const POST_SELF: &str = "---
title: A
date: 2024-01-01
spoiler: x
related: [a]
---

Points at itself.
";

#[cfg(test)]
pub const POST_NO_FRONT_MATTER: &str = "# Just a title

Someone forgot the header.
";

#[cfg(test)]
pub const README: &str = "# My blog

Things I wrote:

<!--START_POSTS-->
- [A](https://example.com/posts/a)
- [B](https://example.com/posts/b)
<!--END_POSTS-->

Thanks for reading.
";
